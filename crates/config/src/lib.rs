//! Configuration management for the renal chat engine
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (RENAL_CHAT_ prefix)
//!
//! Tunable thresholds live in [`constants`] as the single source of truth;
//! the [`Settings`] defaults mirror them.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, BridgeSettings, GenerationSettings, LlmSettings, RetrievalSettings,
    SessionSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
