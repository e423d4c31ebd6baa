//! Response payload assembled by the orchestrator

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use renal_chat_core::{Lang, QueryAnalysis, TranslationMethod};

/// Full response payload for one processed query
///
/// This is the engine's only externally observable surface; every failure
/// path still produces a well-formed instance of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Final answer, in the target language
    pub response: String,
    /// Retrieved document texts backing the answer (at most 3)
    pub source_documents: Vec<String>,
    /// Metadata of the retrieved documents, same order (at most 3)
    pub source_metadata: Vec<HashMap<String, serde_json::Value>>,
    /// Classifier output for the retrieval query
    pub nlu_analysis: QueryAnalysis,
    /// Language the answer is rendered in
    pub target_lang: Lang,
    /// How the query was bridged into English
    pub translation_method: TranslationMethod,
    /// Wall-clock seconds spent in the bridge step
    pub translation_time: f64,
}

impl QueryResponse {
    /// Payload for a degraded exchange where generation failed
    ///
    /// Carries the user-visible error message in the response field and no
    /// source documents; the rest of the request's routing facts are kept
    /// so the caller still sees what happened.
    pub fn degraded(
        message: impl Into<String>,
        target_lang: Lang,
        translation_method: TranslationMethod,
        translation_time: f64,
        nlu_analysis: QueryAnalysis,
    ) -> Self {
        Self {
            response: message.into(),
            source_documents: Vec::new(),
            source_metadata: Vec::new(),
            nlu_analysis,
            target_lang,
            translation_method,
            translation_time,
        }
    }
}
