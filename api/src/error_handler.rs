use answer_policy::PolicyConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qna_service::QnaError;
use thiserror::Error;

use crate::core::http::response_envelope::ApiError;

/// Public application error type.
///
/// Per-turn QnA failures never become an `AppError`; they are absorbed by the
/// bot. What is left is startup and request-shape trouble.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid QnA configuration: {0}")]
    Qna(#[from] QnaError),

    #[error(transparent)]
    Policy(#[from] PolicyConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("not found")]
    NotFound,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            // startup-only
            AppError::Qna(_) | AppError::Policy(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Qna(_) => "QNA_CONFIG_ERROR",
            AppError::Policy(_) => "POLICY_CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiError::new(self.error_code(), self.to_string()).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
