//! Wire models of the `generateanswer` runtime API.
//!
//! Response records are decoded strictly: `answers`, `answer` and `score` are
//! required, so a body of the wrong shape fails with [`crate::QnaError::Decode`]
//! instead of yielding half-empty candidates. Optional parts (`questions`,
//! `context`, `metadata`, ...) default to empty.

use serde::{Deserialize, Serialize};

/// One ranked answer returned by the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCandidate {
    /// Alternate phrasings of the matched question.
    #[serde(default)]
    pub questions: Vec<String>,
    pub answer: String,
    /// Confidence as reported by the backend (0..=100 on the raw API).
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AnswerContext>,
}

impl AnswerCandidate {
    /// First phrasing of the question, or `""` when the backend sent none.
    pub fn first_question(&self) -> &str {
        self.questions.first().map(String::as_str).unwrap_or("")
    }

    /// Follow-up prompts attached to this answer (possibly empty).
    pub fn prompts(&self) -> &[Prompt] {
        self.context
            .as_ref()
            .map(|c| c.prompts.as_slice())
            .unwrap_or(&[])
    }
}

/// Follow-up suggestions attached to a specific answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerContext {
    #[serde(default)]
    pub prompts: Vec<Prompt>,
}

/// A suggested follow-up question, rendered as a selectable button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Sort key for display; not necessarily unique or contiguous.
    pub display_order: i32,
    #[serde(default)]
    pub qna_id: i64,
    pub display_text: String,
}

/// Name/value metadata pair (answers, `strictFilters`, `metadataBoost`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

/// Multi-turn carry-over sent as the request `context`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaBotState {
    pub previous_qna_id: i64,
    #[serde(default)]
    pub previous_user_query: String,
}

/// Body of `POST .../generateanswer`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateAnswerRequest<'a> {
    pub question: &'a str,
    pub top: u32,
    pub context: Option<&'a QnaBotState>,
    pub strict_filters: &'a [Metadata],
    pub metadata_boost: &'a [Metadata],
    pub score_threshold: f64,
}

/// Response of `POST .../generateanswer`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateAnswerResponse {
    pub answers: Vec<AnswerCandidate>,
}
