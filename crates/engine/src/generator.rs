//! English response generation
//!
//! One chat completion per exchange: a fixed clinical-triage system prompt
//! with the patient record appended, a short window of conversation
//! history, and a final user turn carrying the retrieved evidence and the
//! question.

use std::sync::Arc;

use renal_chat_core::{ChatMessage, LanguageModel, Result, ScoredDocument, Turn};

use renal_chat_config::constants::{generation, session};
use renal_chat_config::Settings;

/// Clinical-triage behavior protocol
///
/// Expressed as prompt instructions; compliance is delegated to the model
/// and not mechanically enforced.
const TRIAGE_PROMPT: &str = "\
You are a kidney-care assistant for chronic kidney disease patients in Sri Lanka.

Follow this protocol:
1. Greet briefly on the first exchange only.
2. If the patient reports chest pain, severe breathlessness, no urine output, \
confusion or fainting, tell them to seek emergency care immediately before \
anything else.
3. Ask at most 2 clarifying questions before giving advice.
4. Answer direct questions directly.
5. Keep answers short and concrete; avoid medical jargon.
6. Always close by telling the patient to contact their kidney doctor or \
clinic if symptoms continue or worsen.

Use the provided patient record and reference information when they are \
relevant. If the reference information does not cover the question, say what \
you can based on general kidney-care guidance.";

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// History turns forwarded to the prompt
    pub history_turns: usize,
    /// Retrieved documents embedded into the prompt
    pub max_context_documents: usize,
    /// Completion temperature
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            history_turns: session::GENERATION_HISTORY_TURNS,
            max_context_documents: session::MAX_CONTEXT_DOCUMENTS,
            temperature: generation::ANSWER_TEMPERATURE,
        }
    }
}

impl From<&Settings> for GeneratorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            history_turns: settings.session.generation_history_turns,
            max_context_documents: settings.session.max_context_documents,
            temperature: settings.generation.answer_temperature,
        }
    }
}

/// English response generator
pub struct ResponseGenerator {
    model: Arc<dyn LanguageModel>,
    config: GeneratorConfig,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    /// Generate the English answer for a query
    ///
    /// Transport failures propagate; the orchestrator turns them into a
    /// degraded payload rather than a crashed request.
    pub async fn generate(
        &self,
        english_query: &str,
        documents: &[ScoredDocument],
        patient_context: &str,
        history: &[Turn],
    ) -> Result<String> {
        let messages = self.build_messages(english_query, documents, patient_context, history);
        let answer = self.model.chat(&messages, self.config.temperature).await?;
        Ok(answer.trim().to_string())
    }

    fn build_messages(
        &self,
        english_query: &str,
        documents: &[ScoredDocument],
        patient_context: &str,
        history: &[Turn],
    ) -> Vec<ChatMessage> {
        let mut system = TRIAGE_PROMPT.to_string();
        if !patient_context.is_empty() {
            system.push_str("\n\nPatient record:\n");
            system.push_str(patient_context);
        }

        let mut messages = vec![ChatMessage::system(system)];

        let skip = history.len().saturating_sub(self.config.history_turns);
        messages.extend(history[skip..].iter().map(ChatMessage::from));

        messages.push(ChatMessage::user(self.final_turn(english_query, documents)));
        messages
    }

    fn final_turn(&self, english_query: &str, documents: &[ScoredDocument]) -> String {
        if documents.is_empty() {
            return format!("Patient question: {}", english_query);
        }

        let evidence = documents
            .iter()
            .take(self.config.max_context_documents)
            .enumerate()
            .map(|(i, doc)| format!("[{}] {}", i + 1, doc.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Reference information:\n{}\n\nPatient question: {}",
            evidence, english_query
        )
    }
}
