//! Outbound message shapes handed to the conversation surface.

use serde::{Deserialize, Serialize};

/// How a text message body should be interpreted by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Plain,
    Markdown,
}

/// One message of a reply, in send order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String, format: TextFormat },
    Card(HeroCard),
}

impl OutboundMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            format: TextFormat::Markdown,
        }
    }

    /// Text body, or `None` for cards.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Card(_) => None,
        }
    }

    pub fn as_card(&self) -> Option<&HeroCard> {
        match self {
            Self::Card(card) => Some(card),
            Self::Text { .. } => None,
        }
    }
}

/// Interactive card with selectable buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub buttons: Vec<CardButton>,
}

/// A button that posts `value` back as the user's next message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardButton {
    pub label: String,
    pub value: String,
}

/// What the target conversation surface can display. Supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub supports_cards: bool,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            supports_cards: true,
        }
    }
}

impl SurfaceCapabilities {
    pub fn text_only() -> Self {
        Self {
            supports_cards: false,
        }
    }
}
