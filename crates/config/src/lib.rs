//! Configuration management for the front desk agent
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (FRONTDESK_ prefix)

pub mod prompts;
pub mod settings;

pub use prompts::{FallbackTemplates, PromptTemplates, SystemPrompt};
pub use settings::{
    load_settings, LlmSettings, ServerSettings, Settings, SttSettings, VisionSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
