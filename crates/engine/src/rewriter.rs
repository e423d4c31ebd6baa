//! Context-aware query rewriting
//!
//! Follow-up questions lean on the conversation ("is that dangerous?",
//! "how much of it can I drink?"). Retrieval sees none of that context, so
//! the query is rewritten into a standalone question first. A failed
//! rewrite degrades to the original query.

use std::sync::Arc;

use renal_chat_core::{ChatMessage, LanguageModel, Turn};

use renal_chat_config::constants::generation;

/// Standalone-query rewriter
pub struct ContextRewriter {
    model: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl ContextRewriter {
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

    /// Rewrite a follow-up query into a standalone one
    ///
    /// Empty history passes the query through untouched; so does any
    /// transport failure.
    pub async fn contextualize(&self, query: &str, history: &[Turn]) -> String {
        if history.is_empty() {
            return query.to_string();
        }

        let messages = self.rewrite_messages(query, history);
        match self.model.chat(&messages, self.temperature).await {
            Ok(rewritten) => {
                let rewritten = rewritten.trim().to_string();
                if rewritten.is_empty() {
                    query.to_string()
                } else {
                    tracing::debug!(query = %query, rewritten = %rewritten, "query contextualized");
                    rewritten
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "rewrite call failed, using query as-is");
                query.to_string()
            }
        }
    }

    fn rewrite_messages(&self, query: &str, history: &[Turn]) -> Vec<ChatMessage> {
        let transcript = history
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Conversation so far:\n{}\n\nRewrite the patient's next message as a \
             standalone question that keeps its meaning and can be understood \
             without the conversation. Return only the rewritten question.\n\n\
             Next message: {}",
            transcript, query
        );

        vec![
            ChatMessage::system(
                "You rewrite follow-up patient messages into standalone questions.",
            ),
            ChatMessage::user(prompt),
        ]
    }
}
