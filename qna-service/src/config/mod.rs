pub mod default_config;
pub mod qna_config;
pub mod qna_endpoint;
