//! Default QnA config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! Required:
//! - `QNA_ENDPOINT_HOSTNAME` = runtime host, normalized (see [`normalize_host`])
//! - `QNA_KNOWLEDGEBASE_ID`  = knowledge base id
//! - `QNA_AUTH_KEY`          = endpoint key
//!
//! Optional:
//! - `QNA_TOP`             = answers requested (u32, default 3)
//! - `QNA_SCORE_THRESHOLD` = minimum score on the 0..=100 scale (default 0)
//! - `QNA_TIMEOUT_SECS`    = request timeout (u64, default 15)
//! - `QNA_MAX_RETRIES`     = extra attempts on transport failure (0 or 1, default 0)
//!
//! [`normalize_host`]: crate::config::qna_endpoint::normalize_host

use std::str::FromStr;

use crate::{
    config::{
        qna_config::{DEFAULT_TIMEOUT_SECS, DEFAULT_TOP, QnaConfig, QnaOptions},
        qna_endpoint::QnaEndpoint,
    },
    error_handler::{ConfigError, Result},
};

/// Builds and validates a [`QnaConfig`] from the process environment.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if a required variable is unset or blank
/// - [`ConfigError::InvalidNumber`] if a numeric variable does not parse
/// - [`ConfigError::OutOfRange`] if a value fails validation
pub fn config_from_env() -> Result<QnaConfig> {
    config_from_lookup(|k| std::env::var(k).ok())
}

/// Same as [`config_from_env`] over an arbitrary key lookup.
pub fn config_from_lookup<F>(get: F) -> Result<QnaConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| {
        get(k)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let required = |k: &'static str| get(k).ok_or(ConfigError::MissingVar(k));

    let host = required("QNA_ENDPOINT_HOSTNAME")?;
    let kb_id = required("QNA_KNOWLEDGEBASE_ID")?;
    let key = required("QNA_AUTH_KEY")?;

    let score_threshold: Option<f64> =
        parse_opt("QNA_SCORE_THRESHOLD", get("QNA_SCORE_THRESHOLD"), "expected a number")?;
    if score_threshold.is_some_and(|x| !x.is_finite()) {
        return Err(ConfigError::InvalidNumber {
            var: "QNA_SCORE_THRESHOLD",
            reason: "expected a finite number",
        }
        .into());
    }

    let options = QnaOptions {
        top: parse_opt("QNA_TOP", get("QNA_TOP"), "expected u32")?.unwrap_or(DEFAULT_TOP),
        score_threshold: score_threshold.unwrap_or(0.0),
        ..QnaOptions::default()
    };

    let cfg = QnaConfig {
        endpoint: QnaEndpoint::new(host, kb_id, key),
        options,
        timeout_secs: parse_opt("QNA_TIMEOUT_SECS", get("QNA_TIMEOUT_SECS"), "expected u64")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        max_retries: parse_opt("QNA_MAX_RETRIES", get("QNA_MAX_RETRIES"), "expected u32")?
            .unwrap_or(0),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn parse_opt<T: FromStr>(
    var: &'static str,
    value: Option<String>,
    reason: &'static str,
) -> std::result::Result<Option<T>, ConfigError> {
    value
        .map(|v| v.parse::<T>().map_err(|_| ConfigError::InvalidNumber { var, reason }))
        .transpose()
}
