//! Unified error handling for `qna-service`.
//!
//! This module exposes a single top-level error type [`QnaError`] for the whole
//! library and groups startup errors in [`ConfigError`].
//!
//! All messages include the suffix `[QnA Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, QnaError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `qna-service` crate.
///
/// A failed query is always one of two kinds: the call could not be completed
/// (`Transport`, `HttpStatus`, `Timeout`) or the body did not have the
/// expected shape (`Decode`). See [`QnaError::is_transport`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum QnaError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (connect, TLS, body read).
    #[error("[QnA Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[QnA Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Operation exceeded the configured timeout.
    #[error("[QnA Service] operation timed out after {0:?}")]
    Timeout(Duration),

    /// Response payload could not be decoded as expected.
    #[error("[QnA Service] decode error: {0}")]
    Decode(String),
}

impl QnaError {
    /// `true` when the call itself failed (connectivity, status, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            QnaError::Transport(_) | QnaError::HttpStatus { .. } | QnaError::Timeout(_)
        )
    }

    /// `true` when the response arrived but had the wrong shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, QnaError::Decode(_))
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[QnA Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like `top`, timeouts, thresholds).
    #[error("[QnA Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `QNA_TOP`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid host).
    #[error("[QnA Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `QNA_ENDPOINT_HOSTNAME`).
        var: &'static str,
        /// Explanation.
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[QnA Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `top`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Makes a short, single-line snippet of an upstream body for logs and errors.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let flat: String = body
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.trim();
    if flat.chars().count() <= MAX {
        flat.to_string()
    } else {
        let cut: String = flat.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
