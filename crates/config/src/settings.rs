//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{bridge, endpoints, generation, retrieval, session, timeouts};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// LLM client configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Bridge translation configuration
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Session and prompt-window configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Generation configuration
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// LLM client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Chat-completion endpoint (OpenRouter / OpenAI compatible)
    pub endpoint: String,
    /// API key; read from the environment in deployments
    #[serde(default)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens per completion
    pub max_tokens: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OPENROUTER_DEFAULT.to_string(),
            api_key: String::new(),
            model: "meta-llama/llama-3.1-8b-instruct".to_string(),
            max_tokens: 512,
            timeout_secs: timeouts::LLM_REQUEST_SECS,
        }
    }
}

/// Bridge translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Classifier confidence gate between the fast and smart paths
    pub confidence_threshold: f32,
    /// Maximum dictionary-hint terms in a fast-path query
    pub max_hint_terms: usize,
    /// Maximum entity terms in a fast-path query
    pub max_entity_terms: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: bridge::NLU_CONFIDENCE_THRESHOLD,
            max_hint_terms: bridge::MAX_HINT_TERMS,
            max_entity_terms: bridge::MAX_ENTITY_TERMS,
        }
    }
}

/// Retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Hits requested from the vector store per query variant
    pub variant_top_k: usize,
    /// Candidates surviving into the final result
    pub final_top_k: usize,
    /// Maximum query variants per request
    pub max_query_variants: usize,
    /// Post-sigmoid relevance floor; candidates at or below are discarded
    pub relevance_floor: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            variant_top_k: retrieval::VARIANT_TOP_K,
            final_top_k: retrieval::FINAL_TOP_K,
            max_query_variants: retrieval::MAX_QUERY_VARIANTS,
            relevance_floor: retrieval::RELEVANCE_FLOOR,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// History entries retained per session
    pub max_history_turns: usize,
    /// History turns forwarded to the generation prompt
    pub generation_history_turns: usize,
    /// Retrieved documents embedded into the generation prompt
    pub max_context_documents: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_history_turns: session::MAX_HISTORY_TURNS,
            generation_history_turns: session::GENERATION_HISTORY_TURNS,
            max_context_documents: session::MAX_CONTEXT_DOCUMENTS,
        }
    }
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Temperature for the main answer call
    pub answer_temperature: f32,
    /// Temperature for rewrite and style-translation calls
    pub style_temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            answer_temperature: generation::ANSWER_TEMPERATURE,
            style_temperature: generation::STYLE_TEMPERATURE,
        }
    }
}

impl Settings {
    /// Validate threshold ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bridge.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "bridge.confidence_threshold".to_string(),
                message: "must be within [0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.retrieval.relevance_floor) {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.relevance_floor".to_string(),
                message: "must be within [0, 1]".to_string(),
            });
        }
        if self.session.max_history_turns == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_history_turns".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from optional TOML files plus environment overrides
///
/// Lookup order: `config/default.toml`, then `config/{env}.toml` when an
/// environment name is given, then `RENAL_CHAT`-prefixed environment
/// variables (e.g. `RENAL_CHAT_LLM__MODEL`).
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("RENAL_CHAT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
