//! JSON envelope around every reply: `{ success, data? , error? }`.
//!
//! Turn replies never use the error side; it is reserved for request-shape
//! rejections and unknown routes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Stable, machine-readable code, e.g. "UNPROCESSABLE_ENTITY".
    pub code: &'static str,
    pub message: String,
    /// Echo of the `X-Request-Id` header so clients can quote it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// Which request field went wrong, e.g. `text` or `context.previousQnaId`.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            details: Vec::new(),
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Adds a detail unless it carries neither a path nor a hint.
    pub fn with_detail(mut self, detail: ApiErrorDetail) -> Self {
        if detail.path.is_some() || detail.hint.is_some() {
            self.details.push(detail);
        }
        self
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self),
        }
        .into_response_with_status(status)
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data` set.
    pub fn ok(data: T) -> Response {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
        .into_response_with_status(StatusCode::OK)
    }

    fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
