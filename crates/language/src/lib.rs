//! Language routing for the renal chat engine
//!
//! Three concerns live here:
//! - Detecting whether a query should be answered in English or Sinhala
//! - Bridging a Sinhala/Singlish query into an English search query
//!   (local-NLU fast path, LLM smart path)
//! - Styling the generated English answer back into Sinhala

pub mod bridge;
pub mod detect;
pub mod dictionary;
pub mod style;

pub use bridge::{BridgeConfig, BridgeOutcome, HybridBridge};
pub use detect::{contains_sinhala, detect_target_language};
pub use style::StyleLayer;

use thiserror::Error;

/// Language layer errors
#[derive(Error, Debug)]
pub enum LanguageError {
    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Translation error: {0}")]
    Translation(String),
}

impl From<LanguageError> for renal_chat_core::Error {
    fn from(err: LanguageError) -> Self {
        renal_chat_core::Error::Language(err.to_string())
    }
}
