//! POST /api/messages: one user turn.

use std::sync::Arc;

use answer_policy::SurfaceCapabilities;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::messages::message_request::{MessageRequest, MessageResponse},
};

/// Handler: POST /api/messages
///
/// Always answers 200 once the body parses; backend failures show up as the
/// fallback message, not as an error status.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3978/api/messages \
///   -H 'content-type: application/json' \
///   -d '{"text":"How do I reset my password?","supportsCards":false}'
/// ```
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<MessageRequest>,
) -> Response {
    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    debug!(
        request_id = %request_id,
        supports_cards = body.supports_cards,
        has_context = body.context.is_some(),
        "post_message: start"
    );

    let caps = SurfaceCapabilities {
        supports_cards: body.supports_cards,
    };
    let messages = state
        .bot
        .on_message(&body.text, body.context.as_ref(), caps)
        .await;

    debug!(
        request_id = %request_id,
        messages = messages.len(),
        "post_message: done"
    );

    ApiResponse::ok(MessageResponse { messages })
}
