//! Thin client for the QnA Maker runtime API.
//!
//! - `POST {host}/knowledgebases/{kb}/generateanswer`: ranked answers for a question
//!
//! The client never re-ranks: candidates come back in backend order.
//! Failures are normalized into [`QnaError`]; with `max_retries = 1` a single
//! extra attempt is made for connect/timeout errors and 5xx statuses.
//!
//! # Examples
//!
//! ```no_run
//! use qna_service::{QnaClient, QnaConfig, QnaEndpoint};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = QnaConfig::new(QnaEndpoint::new("contoso.azurewebsites.net", "kb-id", "key"));
//! let client = QnaClient::new(cfg)?;
//!
//! for c in client.query("How do I reset my password?", None).await? {
//!     println!("{:>5.1}  {}", c.score, c.answer);
//! }
//! # Ok(()) }
//! ```

use std::{
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use reqwest::header;
use tracing::{debug, error, info, warn};

use crate::{
    config::qna_config::QnaConfig,
    error_handler::{ConfigError, QnaError, Result, make_snippet},
    models::{AnswerCandidate, GenerateAnswerRequest, GenerateAnswerResponse, QnaBotState},
};

/// Pause before the single retry.
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Anything that can turn a question into ranked answer candidates.
///
/// Implemented by [`QnaClient`]; the bot depends on this trait so a turn can
/// run against a canned source.
pub trait AnswerSource: Send + Sync {
    fn query<'a>(
        &'a self,
        question: &'a str,
        context: Option<&'a QnaBotState>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AnswerCandidate>>> + Send + 'a>>;
}

/// Client for one knowledge base.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + auth header). Construct
/// once and share behind an `Arc`.
#[derive(Debug)]
pub struct QnaClient {
    client: reqwest::Client,
    cfg: QnaConfig,
    url_generate: String,
    timeout: Duration,
}

impl QnaClient {
    /// Creates a new [`QnaClient`] from the given config.
    ///
    /// # Errors
    /// - [`QnaError::Config`] if the config fails validation or the key is not
    ///   a valid header value
    /// - [`QnaError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: QnaConfig) -> Result<Self> {
        cfg.validate()?;

        let timeout = Duration::from_secs(cfg.timeout_secs);

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&cfg.endpoint.authorization()).map_err(
            |_| ConfigError::InvalidFormat {
                var: "QNA_AUTH_KEY",
                reason: "not a valid HTTP header value",
            },
        )?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_generate = cfg.endpoint.generate_answer_url();

        info!(
            host = %cfg.endpoint.host,
            knowledge_base = %cfg.endpoint.knowledge_base_id,
            top = cfg.options.top,
            timeout_secs = cfg.timeout_secs,
            max_retries = cfg.max_retries,
            "QnaClient initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    /// Asks the knowledge base and returns candidates in backend order.
    ///
    /// `question` is sent verbatim (no trimming, no emptiness check).
    ///
    /// # Errors
    /// - [`QnaError::Transport`] / [`QnaError::Timeout`] if the call cannot complete
    /// - [`QnaError::HttpStatus`] for non-2xx responses
    /// - [`QnaError::Decode`] if the body is not `{ "answers": [...] }`
    pub async fn query(
        &self,
        question: &str,
        context: Option<&QnaBotState>,
    ) -> Result<Vec<AnswerCandidate>> {
        let mut attempt = 0;
        loop {
            match self.query_once(question, context).await {
                Ok(answers) => return Ok(answers),
                Err(e) if attempt < self.cfg.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    warn!(
                        attempt,
                        error = %e,
                        backoff_ms = RETRY_BACKOFF.as_millis(),
                        "generateanswer failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn query_once(
        &self,
        question: &str,
        context: Option<&QnaBotState>,
    ) -> Result<Vec<AnswerCandidate>> {
        let started = Instant::now();
        let opts = &self.cfg.options;
        let body = GenerateAnswerRequest {
            question,
            top: opts.top,
            context,
            strict_filters: &opts.strict_filters,
            metadata_boost: &opts.metadata_boost,
            score_threshold: opts.score_threshold,
        };

        debug!(
            knowledge_base = %self.cfg.endpoint.knowledge_base_id,
            question_len = question.len(),
            has_context = context.is_some(),
            "POST {}", self.url_generate
        );

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "generateanswer returned non-success status"
            );

            return Err(QnaError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let text = resp.text().await.map_err(|e| self.map_transport(e))?;

        let out: GenerateAnswerResponse = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    snippet = %make_snippet(&text),
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateanswer response"
                );
                return Err(QnaError::Decode(format!(
                    "serde error: {e}; expected `answers[]` with `answer` and `score`"
                )));
            }
        };

        info!(
            answers = out.answers.len(),
            top_score = out.answers.first().map(|a| a.score),
            latency_ms = started.elapsed().as_millis(),
            "generateanswer completed"
        );

        Ok(out.answers)
    }

    fn map_transport(&self, e: reqwest::Error) -> QnaError {
        if e.is_timeout() {
            QnaError::Timeout(self.timeout)
        } else {
            QnaError::Transport(e)
        }
    }
}

impl AnswerSource for QnaClient {
    fn query<'a>(
        &'a self,
        question: &'a str,
        context: Option<&'a QnaBotState>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AnswerCandidate>>> + Send + 'a>> {
        Box::pin(QnaClient::query(self, question, context))
    }
}

fn is_retryable(e: &QnaError) -> bool {
    match e {
        QnaError::Timeout(_) => true,
        QnaError::Transport(inner) => inner.is_connect() || inner.is_timeout(),
        QnaError::HttpStatus { status, .. } => status.is_server_error(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{qna_config::QnaOptions, qna_endpoint::QnaEndpoint};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/qnamaker/knowledgebases/kb-1/generateanswer";

    fn test_config(uri: &str) -> QnaConfig {
        QnaConfig {
            // Mock servers speak plain http, so skip normalization here.
            endpoint: QnaEndpoint {
                host: format!("{uri}/qnamaker"),
                knowledge_base_id: "kb-1".to_string(),
                endpoint_key: "secret".to_string(),
            },
            options: QnaOptions::default(),
            timeout_secs: 1,
            max_retries: 0,
        }
    }

    fn answers_body() -> serde_json::Value {
        json!({
            "answers": [
                {"questions": ["Q1"], "answer": "A1", "score": 91.0, "id": 1},
                {"questions": ["Q2"], "answer": "A2", "score": 40.0, "id": 2}
            ]
        })
    }

    #[tokio::test]
    async fn sends_auth_header_and_expected_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("authorization", "EndpointKey secret"))
            .and(body_json(json!({
                "question": "what is rust",
                "top": 3,
                "context": null,
                "strictFilters": [],
                "metadataBoost": [],
                "scoreThreshold": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(answers_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let answers = client.query("what is rust", None).await.unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].answer, "A1");
        assert_eq!(answers[1].answer, "A2");
    }

    #[tokio::test]
    async fn keeps_backend_order() {
        let server = MockServer::start().await;
        let body = json!({
            "answers": [
                {"questions": ["low"], "answer": "low", "score": 10.0},
                {"questions": ["high"], "answer": "high", "score": 99.0}
            ]
        });
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let answers = client.query("q", None).await.unwrap();
        assert_eq!(answers[0].answer, "low");
        assert_eq!(answers[1].answer, "high");
    }

    #[tokio::test]
    async fn passes_empty_question_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answers": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let answers = client.query("   ", None).await.unwrap();
        assert!(answers.is_empty());

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["question"], "   ");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let err = client.query("q", None).await.unwrap_err();

        assert!(err.is_transport());
        match err {
            QnaError::HttpStatus { status, snippet, .. } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(snippet, "unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let err = client.query("q", None).await.unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(answers_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let err = client.query("q", None).await.unwrap_err();
        assert!(matches!(err, QnaError::Timeout(_)));
    }

    #[tokio::test]
    async fn retries_once_on_500() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(answers_body()))
            .mount(&server)
            .await;

        let mut cfg = test_config(&server.uri());
        cfg.max_retries = 1;
        let client = QnaClient::new(cfg).unwrap();

        let answers = client.query("q", None).await.unwrap();
        assert_eq!(answers.len(), 2);
    }

    #[tokio::test]
    async fn retries_once_when_connection_is_refused() {
        // Bind and drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut cfg = test_config(&format!("http://127.0.0.1:{port}"));
        cfg.max_retries = 1;
        let client = QnaClient::new(cfg).unwrap();

        let started = Instant::now();
        let err = client.query("q", None).await.unwrap_err();

        assert!(matches!(&err, QnaError::Transport(e) if e.is_connect()), "{err:?}");
        assert!(started.elapsed() >= RETRY_BACKOFF);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad question"))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = test_config(&server.uri());
        cfg.max_retries = 1;
        let client = QnaClient::new(cfg).unwrap();

        let err = client.query("q", None).await.unwrap_err();
        assert!(matches!(err, QnaError::HttpStatus { .. }));
    }

    #[tokio::test]
    async fn without_retry_a_500_fails_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let err = client.query("q", None).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn forwards_prior_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answers": []})))
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let state = QnaBotState {
            previous_qna_id: 42,
            previous_user_query: "billing".into(),
        };
        client.query("and refunds?", Some(&state)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["context"]["previousQnaId"], 42);
        assert_eq!(sent["context"]["previousUserQuery"], "billing");
    }

    #[tokio::test]
    async fn works_through_the_trait_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(answers_body()))
            .mount(&server)
            .await;

        let client = QnaClient::new(test_config(&server.uri())).unwrap();
        let source: &dyn AnswerSource = &client;
        let answers = source.query("q", None).await.unwrap();
        assert_eq!(answers[0].first_question(), "Q1");
    }
}
