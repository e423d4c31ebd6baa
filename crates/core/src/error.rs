//! Error types shared across the workspace

use thiserror::Error;

/// Top-level error for the renal chat engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Language error: {0}")]
    Language(String),

    #[error("Retrieval error: {0}")]
    Rag(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Patient store error: {0}")]
    PatientStore(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;
