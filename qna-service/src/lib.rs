//! Client library for a hosted QnA Maker knowledge base.
//!
//! [`QnaClient::query`] sends a question to the `generateanswer` runtime API
//! and returns ranked [`AnswerCandidate`]s in backend order. Config is passed
//! in explicitly ([`QnaConfig`]) or read from the environment
//! ([`config_from_env`]).

pub mod config;
pub mod error_handler;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::default_config::{config_from_env, config_from_lookup};
pub use config::qna_config::{QnaConfig, QnaOptions};
pub use config::qna_endpoint::{QnaEndpoint, normalize_host};
pub use error_handler::{ConfigError, QnaError};
pub use models::{AnswerCandidate, AnswerContext, Metadata, Prompt, QnaBotState};
pub use services::qna_client::{AnswerSource, QnaClient};
