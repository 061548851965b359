//! Answer selection and reply rendering.
//!
//! Pure function of the ranked candidates, a [`PolicyConfig`] and the
//! surface's capabilities. Candidates are never re-ranked; only follow-up
//! prompts are sorted (stably, by `display_order`).

use qna_service::{AnswerCandidate, Prompt};
use tracing::debug;

use crate::{
    config::PolicyConfig,
    message::{CardButton, HeroCard, OutboundMessage, SurfaceCapabilities},
};

/// Confidence band of the top candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    NoMatch,
    Low,
    Medium,
    High,
}

/// Maps a score onto a band. Checked in order: no-match, low, medium, high.
pub fn classify(score: f64, cfg: &PolicyConfig) -> Confidence {
    if score <= cfg.no_match_score {
        Confidence::NoMatch
    } else if score < cfg.low_confidence_below {
        Confidence::Low
    } else if cfg.medium_confidence_below.is_some_and(|mid| score < mid) {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

/// Decides the reply for one turn. Messages are returned in send order.
pub fn render(
    candidates: &[AnswerCandidate],
    cfg: &PolicyConfig,
    caps: SurfaceCapabilities,
) -> Vec<OutboundMessage> {
    let Some(top) = candidates.first() else {
        debug!("no candidates, sending fallback");
        return no_answer(cfg);
    };

    let band = classify(top.score, cfg);
    debug!(
        candidates = candidates.len(),
        top_score = top.score,
        band = ?band,
        "answer band selected"
    );

    match band {
        Confidence::NoMatch => no_answer(cfg),

        Confidence::Low => {
            let mut out = Vec::with_capacity(candidates.len() + 1);
            out.push(OutboundMessage::plain(&cfg.messages.low_confidence_header));
            out.extend(candidates.iter().map(qa_message));
            out
        }

        Confidence::Medium => vec![
            OutboundMessage::plain(&cfg.messages.medium_confidence_caveat),
            OutboundMessage::markdown(&top.answer),
        ],

        Confidence::High => {
            let prompts = top.prompts();
            if !prompts.is_empty() && caps.supports_cards {
                return vec![
                    OutboundMessage::plain(&top.answer),
                    OutboundMessage::Card(related_topics_card(
                        &cfg.messages.related_topics_title,
                        prompts,
                    )),
                ];
            }

            let mut out = vec![OutboundMessage::markdown(&top.answer)];
            if cfg.list_other_topics && candidates.len() > 1 {
                out.push(OutboundMessage::plain(&cfg.messages.other_topics_header));
                out.extend(candidates[1..].iter().map(qa_message));
            }
            out
        }
    }
}

/// Markdown Question/Answer block, terminated by a blank line.
pub fn qa_block(question: &str, answer: &str) -> String {
    format!("**Question**:\n\n{question}\n\n**Answer**:\n\n{answer}\n\n")
}

/// Prompts in display order; ties keep arrival order.
pub fn sorted_prompts(prompts: &[Prompt]) -> Vec<&Prompt> {
    let mut sorted: Vec<&Prompt> = prompts.iter().collect();
    sorted.sort_by_key(|p| p.display_order);
    sorted
}

/// Card with one button per prompt; label and posted value are the prompt text.
pub fn related_topics_card(title: &str, prompts: &[Prompt]) -> HeroCard {
    let buttons = sorted_prompts(prompts)
        .into_iter()
        .map(|p| CardButton {
            label: p.display_text.clone(),
            value: p.display_text.clone(),
        })
        .collect();

    HeroCard {
        text: None,
        title: Some(title.to_string()),
        buttons,
    }
}

fn qa_message(c: &AnswerCandidate) -> OutboundMessage {
    OutboundMessage::markdown(qa_block(c.first_question(), &c.answer))
}

fn no_answer(cfg: &PolicyConfig) -> Vec<OutboundMessage> {
    vec![OutboundMessage::plain(&cfg.messages.no_answer)]
}
