//! Style reversal: English answer -> Sinhala
//!
//! The generation model is asked to answer in the target language already;
//! this layer only repairs the cases where it answered in English anyway.
//! A failed repair returns the English text so the patient always gets an
//! answer.

use std::sync::Arc;

use renal_chat_core::{ChatMessage, Lang, LanguageModel};

use renal_chat_config::constants::generation;

use crate::detect::contains_sinhala;
use crate::dictionary;
use crate::LanguageError;

/// Style translation layer
pub struct StyleLayer {
    model: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl StyleLayer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            temperature: generation::STYLE_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Convert a generated response into the target language
    ///
    /// English targets pass through verbatim. Sinhala targets pass through
    /// when the model already answered in Sinhala script; otherwise one LLM
    /// call restyles the answer, falling back to the English text on
    /// failure.
    pub async fn style_back(&self, response: &str, target: Lang) -> String {
        if target == Lang::En {
            return response.to_string();
        }

        if contains_sinhala(response) {
            tracing::debug!("response already in Sinhala, style pass skipped");
            return response.to_string();
        }

        match self.restyle(response).await {
            Ok(styled) => styled,
            Err(e) => {
                tracing::warn!(error = %e, "returning English response");
                response.to_string()
            }
        }
    }

    async fn restyle(&self, response: &str) -> Result<String, LanguageError> {
        let messages = self.style_messages(response);
        let styled = self
            .model
            .chat(&messages, self.temperature)
            .await
            .map_err(|e| LanguageError::Translation(e.to_string()))?;

        let styled = styled.trim();
        if styled.is_empty() {
            return Err(LanguageError::Translation(
                "empty styled response".to_string(),
            ));
        }
        Ok(styled.to_string())
    }

    fn style_messages(&self, response: &str) -> Vec<ChatMessage> {
        let prompt = format!(
            "Rewrite this medical advice in natural spoken Sinhala. Keep all \
             numbers and English drug names exactly as written. Use these \
             canonical terms:\n{}\n\nAdvice:\n{}",
            dictionary::style_glossary(),
            response
        );

        vec![
            ChatMessage::system(
                "You rewrite English medical advice into natural spoken Sinhala for patients.",
            ),
            ChatMessage::user(prompt),
        ]
    }
}
