use std::sync::Arc;

use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub knowledgebase: String,
    pub host: String,
}

/// Handler: GET /health. Liveness only; the backend is not probed.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        knowledgebase: state.knowledge_base_id.clone(),
        host: state.qna_host.clone(),
    })
}
