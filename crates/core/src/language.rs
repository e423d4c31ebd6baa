//! Language tags and translation-method markers

use serde::{Deserialize, Serialize};

/// Target language of a patient query
///
/// The engine only distinguishes English and Sinhala; romanized Sinhala
/// ("Singlish") input maps to [`Lang::Si`] because the final answer must be
/// rendered in Sinhala script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    #[default]
    En,
    /// Sinhala (including romanized input)
    Si,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Si => "si",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a non-English query was converted into an English search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    /// Query was already English; no bridging performed
    #[default]
    None,
    /// Fast path: local zero-shot classifier plus dictionary lookup
    SinhalaNlu,
    /// Smart path: LLM translation call
    LlmApi,
}

impl TranslationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMethod::None => "none",
            TranslationMethod::SinhalaNlu => "sinhala_nlu",
            TranslationMethod::LlmApi => "llm_api",
        }
    }
}

impl std::fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
