//! Chat-completion client
//!
//! Thin client for OpenRouter/OpenAI-style `/chat/completions` endpoints.
//! The engine performs exactly one completion per call site and never
//! retries; degradation decisions belong to the callers.

pub mod client;

pub use client::{ChatClient, ChatClientConfig};

use thiserror::Error;

/// LLM client errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for renal_chat_core::Error {
    fn from(err: LlmError) -> Self {
        renal_chat_core::Error::Llm(err.to_string())
    }
}
