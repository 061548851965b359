use answer_policy::OutboundMessage;
use qna_service::QnaBotState;
use serde::{Deserialize, Serialize};

/// Request payload for POST /api/messages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    /// Raw user text, forwarded as-is.
    pub text: String,
    /// Optional multi-turn carry-over.
    #[serde(default)]
    pub context: Option<QnaBotState>,
    /// Whether the calling surface can render button cards.
    #[serde(default = "default_supports_cards")]
    pub supports_cards: bool,
}

fn default_supports_cards() -> bool {
    true
}

/// Response payload for POST /api/messages, in send order.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub messages: Vec<OutboundMessage>,
}
