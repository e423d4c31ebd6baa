//! Hybrid bridge translation
//!
//! Converts a Sinhala/Singlish query into an English search query. The
//! local zero-shot classifier plus dictionary lookup handles clear-cut
//! queries without any network call; ambiguous phrasing falls through to a
//! single deterministic LLM translation call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use renal_chat_core::{
    ChatMessage, Classifier, LanguageModel, QueryAnalysis, TranslationMethod, Turn, TurnRole,
};

use renal_chat_config::constants::bridge as defaults;
use renal_chat_config::BridgeSettings;

use crate::dictionary;
use crate::LanguageError;

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Classifier confidence above which the fast path is trusted
    pub confidence_threshold: f32,
    /// Maximum dictionary-hint terms in a fast-path query
    pub max_hint_terms: usize,
    /// Maximum classifier entity terms in a fast-path query
    pub max_entity_terms: usize,
    /// Temperature for the smart-path translation call
    pub translation_temperature: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::NLU_CONFIDENCE_THRESHOLD,
            max_hint_terms: defaults::MAX_HINT_TERMS,
            max_entity_terms: defaults::MAX_ENTITY_TERMS,
            translation_temperature: defaults::TRANSLATION_TEMPERATURE,
        }
    }
}

impl From<&BridgeSettings> for BridgeConfig {
    fn from(settings: &BridgeSettings) -> Self {
        Self {
            confidence_threshold: settings.confidence_threshold,
            max_hint_terms: settings.max_hint_terms,
            max_entity_terms: settings.max_entity_terms,
            translation_temperature: defaults::TRANSLATION_TEMPERATURE,
        }
    }
}

/// Result of a bridge translation
#[derive(Debug, Clone)]
pub struct BridgeOutcome {
    /// English search query
    pub english_query: String,
    /// Which path produced it
    pub method: TranslationMethod,
    /// Classifier output, when the classifier ran successfully
    pub analysis: Option<QueryAnalysis>,
    /// Wall-clock duration of the whole bridge step
    pub elapsed: Duration,
}

/// Hybrid bridge translator
pub struct HybridBridge {
    classifier: Arc<dyn Classifier>,
    model: Arc<dyn LanguageModel>,
    config: BridgeConfig,
}

impl HybridBridge {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        model: Arc<dyn LanguageModel>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            classifier,
            model,
            config,
        }
    }

    /// Convert a Sinhala/Singlish query into an English search query
    ///
    /// Never fails: if both the classifier and the LLM are unusable the
    /// original query is returned unchanged.
    pub async fn bridge_to_english(&self, query: &str, history: &[Turn]) -> BridgeOutcome {
        let start = Instant::now();
        let hints = dictionary::hint_terms(query);

        let analysis = match self.classifier.classify(query) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                let err = LanguageError::Classification(e.to_string());
                tracing::warn!(error = %err, "falling through to LLM translation");
                None
            }
        };

        if let Some(ref analysis) = analysis {
            if analysis.confidence > self.config.confidence_threshold {
                let english_query = self.fast_path_query(analysis, &hints);
                tracing::debug!(
                    intent = %analysis.intent,
                    confidence = analysis.confidence,
                    english_query = %english_query,
                    "bridge fast path"
                );
                return BridgeOutcome {
                    english_query,
                    method: TranslationMethod::SinhalaNlu,
                    analysis: Some(analysis.clone()),
                    elapsed: start.elapsed(),
                };
            }
        }

        let english_query = self.smart_path_query(query, history).await;
        BridgeOutcome {
            english_query,
            method: TranslationMethod::LlmApi,
            analysis,
            elapsed: start.elapsed(),
        }
    }

    /// Fast path: intent + dictionary hints + classifier entities,
    /// token-deduplicated in first-seen order
    fn fast_path_query(&self, analysis: &QueryAnalysis, hints: &[&str]) -> String {
        let intent = humanize_intent(&analysis.intent);
        let entity_terms = analysis.entity_terms();

        let pieces = std::iter::once(intent.as_str())
            .chain(hints.iter().take(self.config.max_hint_terms).copied())
            .chain(
                entity_terms
                    .iter()
                    .take(self.config.max_entity_terms)
                    .copied(),
            );

        let mut seen: Vec<String> = Vec::new();
        for token in pieces.flat_map(str::split_whitespace) {
            let token = token.to_lowercase();
            if !seen.contains(&token) {
                seen.push(token);
            }
        }

        seen.join(" ")
    }

    /// Smart path: one deterministic LLM translation call; the original
    /// query passes through unchanged on any transport failure
    async fn smart_path_query(&self, query: &str, history: &[Turn]) -> String {
        match self.translate_query(query, history).await {
            Ok(translated) => {
                tracing::debug!(english_query = %translated, "bridge smart path");
                translated
            }
            Err(e) => {
                tracing::warn!(error = %e, "using original query");
                query.to_string()
            }
        }
    }

    async fn translate_query(
        &self,
        query: &str,
        history: &[Turn],
    ) -> Result<String, LanguageError> {
        let messages = self.translation_messages(query, history);
        let translated = self
            .model
            .chat(&messages, self.config.translation_temperature)
            .await
            .map_err(|e| LanguageError::Translation(e.to_string()))?;

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(LanguageError::Translation(
                "empty translation".to_string(),
            ));
        }
        Ok(translated.to_string())
    }

    fn translation_messages(&self, query: &str, history: &[Turn]) -> Vec<ChatMessage> {
        let mut prompt = String::from(
            "Translate this Sinhala or romanized-Sinhala patient message into a \
             short English search query. Return only the translation.\n\n\
             Mandatory term readings:\n",
        );
        prompt.push_str(&dictionary::ambiguous_glossary());

        if let Some(last_assistant) = history
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::Assistant)
        {
            prompt.push_str(&format!(
                "\n\nDoctor previously asked: '{}'",
                last_assistant.content
            ));
        }

        prompt.push_str(&format!("\n\nPatient message: {}", query));

        vec![
            ChatMessage::system(
                "You translate Sinhala medical chat messages into concise English.",
            ),
            ChatMessage::user(prompt),
        ]
    }
}

/// Humanize an intent tag: `ask_diet` -> "ask diet"
fn humanize_intent(intent: &str) -> String {
    intent.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use renal_chat_core::{Error, Result};
    use std::collections::HashMap;

    struct FixedClassifier {
        confidence: f32,
    }

    impl Classifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<QueryAnalysis> {
            let mut entities = HashMap::new();
            entities.insert("symptom".to_string(), vec!["swelling".to_string()]);
            Ok(QueryAnalysis {
                intent: "ask_symptom".to_string(),
                confidence: self.confidence,
                entities,
                translated_query: "my legs are swollen".to_string(),
            })
        }
    }

    struct CountingModel {
        calls: Mutex<usize>,
        reply: Result<&'static str>,
    }

    impl CountingModel {
        fn ok(reply: &'static str) -> Self {
            Self {
                calls: Mutex::new(0),
                reply: Ok(reply),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(0),
                reply: Err(Error::Llm("connection refused".to_string())),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl LanguageModel for CountingModel {
        async fn chat(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
            *self.calls.lock() += 1;
            match &self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(e) => Err(Error::Llm(e.to_string())),
            }
        }
    }

    fn bridge(confidence: f32, model: Arc<CountingModel>) -> HybridBridge {
        HybridBridge::new(
            Arc::new(FixedClassifier { confidence }),
            model,
            BridgeConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_high_confidence_skips_llm() {
        let model = Arc::new(CountingModel::ok("unused"));
        let bridge = bridge(0.9, model.clone());

        let outcome = bridge.bridge_to_english("mata kakul idimila", &[]).await;

        assert_eq!(outcome.method, TranslationMethod::SinhalaNlu);
        assert_eq!(model.call_count(), 0);
        // intent + hints + entity, deduplicated
        assert_eq!(outcome.english_query, "ask symptom legs swelling");
    }

    #[tokio::test]
    async fn test_low_confidence_uses_llm() {
        let model = Arc::new(CountingModel::ok("leg swelling kidney"));
        let bridge = bridge(0.3, model.clone());

        let outcome = bridge.bridge_to_english("mata kakul amaru", &[]).await;

        assert_eq!(outcome.method, TranslationMethod::LlmApi);
        assert_eq!(model.call_count(), 1);
        assert_eq!(outcome.english_query, "leg swelling kidney");
    }

    #[tokio::test]
    async fn test_llm_failure_returns_original_query() {
        let model = Arc::new(CountingModel::failing());
        let bridge = bridge(0.3, model);

        let outcome = bridge.bridge_to_english("mata kakul amaru", &[]).await;

        assert_eq!(outcome.method, TranslationMethod::LlmApi);
        assert_eq!(outcome.english_query, "mata kakul amaru");
    }

    #[tokio::test]
    async fn test_translation_prompt_includes_last_assistant_turn() {
        let model = Arc::new(CountingModel::ok("ok"));
        let bridge = bridge(0.3, model);

        let history = vec![
            Turn::assistant("Where exactly is the pain?"),
            Turn::user("bada"),
        ];
        let messages = bridge.translation_messages("bada ridenawa", &history);

        assert!(messages[1]
            .content
            .contains("Doctor previously asked: 'Where exactly is the pain?'"));
        assert!(messages[1].content.contains("amaru"));
    }

    #[test]
    fn test_humanize_intent() {
        assert_eq!(humanize_intent("ask_diet"), "ask diet");
        assert_eq!(humanize_intent("greeting"), "greeting");
    }
}
