//! Centralized constants for the renal chat engine
//!
//! Single source of truth for thresholds and caps used across the
//! workspace. Settings defaults mirror these values; use the constants
//! instead of repeating literals in multiple crates.

/// Bridge translation (Sinhala query -> English search query)
pub mod bridge {
    /// Classifier confidence above which the local fast path is trusted
    /// and no LLM translation call is made
    pub const NLU_CONFIDENCE_THRESHOLD: f32 = 0.6;

    /// Maximum dictionary-hint terms appended to a fast-path query
    pub const MAX_HINT_TERMS: usize = 5;

    /// Maximum classifier entity terms appended to a fast-path query
    pub const MAX_ENTITY_TERMS: usize = 3;

    /// Temperature for the smart-path translation call
    pub const TRANSLATION_TEMPERATURE: f32 = 0.0;
}

/// Retrieval and re-ranking
pub mod retrieval {
    /// Hits requested from the vector store per query variant
    pub const VARIANT_TOP_K: usize = 5;

    /// Candidates surviving into the final result
    pub const FINAL_TOP_K: usize = 5;

    /// Maximum query variants issued per request
    pub const MAX_QUERY_VARIANTS: usize = 3;

    /// Post-sigmoid relevance probability at or below which a candidate is
    /// discarded, even if that empties the result list
    pub const RELEVANCE_FLOOR: f32 = 0.01;
}

/// Conversation sessions
pub mod session {
    /// History entries retained per session (sliding window)
    pub const MAX_HISTORY_TURNS: usize = 10;

    /// History turns forwarded to the generation prompt
    pub const GENERATION_HISTORY_TURNS: usize = 4;

    /// Retrieved documents embedded into the generation prompt and echoed
    /// back in the response payload
    pub const MAX_CONTEXT_DOCUMENTS: usize = 3;
}

/// Response generation
pub mod generation {
    /// Temperature for the main answer call
    pub const ANSWER_TEMPERATURE: f32 = 0.3;

    /// Temperature for the rewrite and style-translation calls
    pub const STYLE_TEMPERATURE: f32 = 0.2;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// OpenRouter chat-completion endpoint
    pub const OPENROUTER_DEFAULT: &str = "https://openrouter.ai/api/v1";

    /// OpenAI chat-completion endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Timeouts
pub mod timeouts {
    /// LLM request timeout (seconds)
    pub const LLM_REQUEST_SECS: u64 = 30;
}
