//! Chat-completion integration
//!
//! Wraps an OpenAI-compatible chat completions API behind the
//! [`frontdesk_core::ChatBackend`] trait, with retry for transient failures.

pub mod backend;

pub use backend::{LlmConfig, OpenAiBackend};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for frontdesk_core::Error {
    fn from(err: LlmError) -> Self {
        frontdesk_core::Error::Generation(err.to_string())
    }
}
