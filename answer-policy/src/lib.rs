//! Response policy for QnA answers.
//!
//! Public API: [`render`]. Given the ranked candidates for one user message,
//! it picks a confidence band for the top answer and lays out the reply:
//! a fallback, a disambiguation list, a caveated answer, or the answer plus
//! a card of follow-up prompts.

mod config;
mod message;
mod render;

pub use config::{PolicyConfig, PolicyConfigError, PolicyMessages};
pub use message::{CardButton, HeroCard, OutboundMessage, SurfaceCapabilities, TextFormat};
pub use render::{Confidence, classify, qa_block, related_topics_card, render, sorted_prompts};
