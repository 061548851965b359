use std::sync::Arc;

use answer_policy::PolicyConfig;
use qna_service::{AnswerSource, QnaClient, QnaEndpoint, config_from_env};

use crate::{bot::qna_bot::QnaBot, error_handler::AppResult};

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:3978";

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Listen address, e.g. "0.0.0.0:3978".
    pub api_address: String,
    /// Knowledge base id, reported by `/health`.
    pub knowledge_base_id: String,
    /// Normalized runtime host, reported by `/health`.
    pub qna_host: String,
    pub bot: QnaBot,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Missing/invalid `QNA_*` variables or an invalid policy override. Both
    /// are fatal at startup.
    pub fn from_env() -> AppResult<Self> {
        let qna_cfg = config_from_env()?;
        let policy = PolicyConfig::from_env()?;
        let endpoint = qna_cfg.endpoint.clone();
        let client = QnaClient::new(qna_cfg)?;

        Ok(Self::new(
            std::env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into()),
            &endpoint,
            Arc::new(client),
            policy,
        ))
    }

    pub fn new(
        api_address: String,
        endpoint: &QnaEndpoint,
        source: Arc<dyn AnswerSource>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            api_address,
            knowledge_base_id: endpoint.knowledge_base_id.clone(),
            qna_host: endpoint.host.clone(),
            bot: QnaBot::new(source, policy),
        }
    }
}
