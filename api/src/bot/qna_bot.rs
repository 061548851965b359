//! Turn handler: one user message in, an ordered reply out.
//!
//! Query failures never leave this module. Whatever went wrong with the
//! backend, the user sees the same fallback text and the cause goes to the log.

use std::sync::Arc;

use answer_policy::{OutboundMessage, PolicyConfig, SurfaceCapabilities, render};
use qna_service::{AnswerSource, QnaBotState};
use tracing::{error, info};

/// Stateless between turns; cheap to share behind an `Arc`.
pub struct QnaBot {
    source: Arc<dyn AnswerSource>,
    policy: PolicyConfig,
}

impl QnaBot {
    pub fn new(source: Arc<dyn AnswerSource>, policy: PolicyConfig) -> Self {
        Self { source, policy }
    }

    /// Runs one turn: query, then render. Never fails.
    pub async fn on_message(
        &self,
        text: &str,
        context: Option<&QnaBotState>,
        caps: SurfaceCapabilities,
    ) -> Vec<OutboundMessage> {
        info!(text_len = text.len(), "Calling QnA Maker");

        match self.source.query(text, context).await {
            Ok(candidates) => render(&candidates, &self.policy, caps),
            Err(e) => {
                error!(
                    error = %e,
                    transport = e.is_transport(),
                    decode = e.is_decode(),
                    "QnA query failed, sending fallback"
                );
                render(&[], &self.policy, caps)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{future::Future, pin::Pin, sync::Mutex, time::Duration};

    use qna_service::{AnswerCandidate, QnaError};

    /// Canned source: pops one scripted result per query and records questions.
    pub(crate) struct ScriptedSource {
        results: Mutex<Vec<Result<Vec<AnswerCandidate>, QnaError>>>,
        pub(crate) seen: Mutex<Vec<(String, Option<QnaBotState>)>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(results: Vec<Result<Vec<AnswerCandidate>, QnaError>>) -> Self {
            Self {
                results: Mutex::new(results),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnswerSource for ScriptedSource {
        fn query<'a>(
            &'a self,
            question: &'a str,
            context: Option<&'a QnaBotState>,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<AnswerCandidate>, QnaError>> + Send + 'a>>
        {
            self.seen
                .lock()
                .unwrap()
                .push((question.to_string(), context.cloned()));
            let next = self.results.lock().unwrap().remove(0);
            Box::pin(async move { next })
        }
    }

    pub(crate) fn candidate(q: &str, a: &str, score: f64) -> AnswerCandidate {
        AnswerCandidate {
            questions: vec![q.to_string()],
            answer: a.to_string(),
            score,
            id: None,
            source: None,
            metadata: vec![],
            context: None,
        }
    }

    fn bot(results: Vec<Result<Vec<AnswerCandidate>, QnaError>>) -> (QnaBot, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::new(results));
        (QnaBot::new(source.clone(), PolicyConfig::default()), source)
    }

    fn fallback() -> Vec<OutboundMessage> {
        vec![OutboundMessage::plain(
            PolicyConfig::default().messages.no_answer,
        )]
    }

    #[tokio::test]
    async fn renders_high_confidence_answer() {
        let (bot, _) = bot(vec![Ok(vec![candidate("Q", "Forty-two.", 95.0)])]);
        let out = bot
            .on_message("meaning of life", None, SurfaceCapabilities::default())
            .await;
        assert_eq!(out, vec![OutboundMessage::markdown("Forty-two.")]);
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_fallback() {
        let (bot, _) = bot(vec![Err(QnaError::Timeout(Duration::from_secs(15)))]);
        let out = bot.on_message("hi", None, SurfaceCapabilities::default()).await;
        assert_eq!(out, fallback());
    }

    #[tokio::test]
    async fn status_and_decode_failures_degrade_the_same_way() {
        let (bot, _) = bot(vec![
            Err(QnaError::HttpStatus {
                status: status_code(503),
                url: "https://contoso/qnamaker".into(),
                snippet: "unavailable".into(),
            }),
            Err(QnaError::Decode("missing answers".into())),
        ]);
        let caps = SurfaceCapabilities::default();
        assert_eq!(bot.on_message("a", None, caps).await, fallback());
        assert_eq!(bot.on_message("b", None, caps).await, fallback());
    }

    #[tokio::test]
    async fn forwards_text_and_context_unchanged() {
        let (bot, source) = bot(vec![Ok(vec![])]);
        let state = QnaBotState {
            previous_qna_id: 3,
            previous_user_query: "prev".into(),
        };
        bot.on_message("  ", Some(&state), SurfaceCapabilities::default())
            .await;

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].0, "  ");
        assert_eq!(seen[0].1.as_ref(), Some(&state));
    }

    fn status_code(code: u16) -> axum::http::StatusCode {
        axum::http::StatusCode::from_u16(code).unwrap()
    }
}
