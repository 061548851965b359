use crate::{
    config::qna_endpoint::QnaEndpoint,
    error_handler::{ConfigError, Result},
    models::Metadata,
};

/// Number of candidates requested when nothing else is configured.
pub const DEFAULT_TOP: u32 = 3;

/// Request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Upper bound for extra attempts after a failed query.
pub const MAX_RETRIES_CAP: u32 = 1;

/// Per-request knobs sent in the `generateanswer` body.
#[derive(Debug, Clone, PartialEq)]
pub struct QnaOptions {
    /// Maximum number of ranked answers to return.
    pub top: u32,
    /// Minimum score (wire scale 0..=100) for an answer to be returned.
    pub score_threshold: f64,
    /// Metadata pairs an answer must carry to be returned.
    pub strict_filters: Vec<Metadata>,
    /// Metadata pairs that boost matching answers.
    pub metadata_boost: Vec<Metadata>,
}

impl Default for QnaOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            score_threshold: 0.0,
            strict_filters: Vec::new(),
            metadata_boost: Vec::new(),
        }
    }
}

/// Everything [`crate::QnaClient`] needs, passed in at construction.
#[derive(Debug, Clone)]
pub struct QnaConfig {
    pub endpoint: QnaEndpoint,
    pub options: QnaOptions,
    /// Whole-request timeout (connect + body).
    pub timeout_secs: u64,
    /// Extra attempts on connect/timeout/5xx failures (0 or 1).
    pub max_retries: u32,
}

impl QnaConfig {
    /// Config with default options, timeout and no retry.
    pub fn new(endpoint: QnaEndpoint) -> Self {
        Self {
            endpoint,
            options: QnaOptions::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }

    /// Checks the values that would otherwise fail on the first query.
    ///
    /// # Errors
    /// [`ConfigError`] wrapped in [`crate::QnaError::Config`].
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.knowledge_base_id.trim().is_empty() {
            return Err(ConfigError::MissingVar("QNA_KNOWLEDGEBASE_ID").into());
        }
        if self.endpoint.endpoint_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("QNA_AUTH_KEY").into());
        }
        if !(self.endpoint.host.starts_with("https://") || self.endpoint.host.starts_with("http://"))
        {
            return Err(ConfigError::InvalidFormat {
                var: "QNA_ENDPOINT_HOSTNAME",
                reason: "must start with http:// or https://",
            }
            .into());
        }
        if self.options.top == 0 {
            return Err(ConfigError::OutOfRange {
                field: "top",
                detail: "expected at least 1",
            }
            .into());
        }
        if !(0.0..=100.0).contains(&self.options.score_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "score_threshold",
                detail: "expected value in 0..=100",
            }
            .into());
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout_secs",
                detail: "expected at least 1",
            }
            .into());
        }
        if self.max_retries > MAX_RETRIES_CAP {
            return Err(ConfigError::OutOfRange {
                field: "max_retries",
                detail: "expected 0 or 1",
            }
            .into());
        }
        Ok(())
    }
}
