//! OpenRouter/OpenAI-compatible chat client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use renal_chat_config::LlmSettings;
use renal_chat_core::{ChatMessage, LanguageModel, Result};

use crate::LlmError;

/// Chat client configuration
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// API endpoint base (e.g. https://openrouter.ai/api/v1)
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        let settings = LlmSettings::default();
        Self::from(&settings)
    }
}

impl From<&LlmSettings> for ChatClientConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Chat-completion client
///
/// Works with OpenRouter, OpenAI and any server exposing the same
/// `/chat/completions` contract.
pub struct ChatClient {
    config: ChatClientConfig,
    client: Client,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: ChatClientConfig) -> std::result::Result<Self, LlmError> {
        if config.api_key.is_empty() && !config.endpoint.starts_with("http://localhost") {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    async fn execute(&self, request: &ChatRequest) -> std::result::Result<String, LlmError> {
        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(ApiMessage::from).collect(),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(temperature),
        };

        let start = std::time::Instant::now();
        let text = self.execute(&request).await?;
        tracing::debug!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "chat completion finished"
        );

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Wire types for the chat-completion API

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ApiMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use renal_chat_core::ChatRole;

    #[test]
    fn test_client_requires_api_key_for_remote() {
        let config = ChatClientConfig::default();
        assert!(ChatClient::new(config).is_err());

        let config = ChatClientConfig {
            endpoint: "http://localhost:11434/v1".to_string(),
            ..Default::default()
        };
        assert!(ChatClient::new(config).is_ok());
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let config = ChatClientConfig {
            endpoint: "http://localhost:8000/v1/".to_string(),
            ..Default::default()
        };
        let client = ChatClient::new(config).unwrap();
        assert_eq!(client.chat_url(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_request_serialization() {
        let msg = ChatMessage {
            role: ChatRole::User,
            content: "What is CKD?".to_string(),
        };
        let request = ChatRequest {
            model: "test-model".to_string(),
            messages: vec![ApiMessage::from(&msg)],
            max_tokens: Some(256),
            temperature: Some(0.0),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("What is CKD?"));
        assert!(json.contains("max_tokens"));
    }
}
