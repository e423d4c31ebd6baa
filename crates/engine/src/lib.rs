//! Orchestration engine for the renal chat service
//!
//! Ties the language, retrieval and generation layers together behind one
//! call, `ChatEngine::process_query`, and owns the two pieces of shared
//! state: the response cache and the per-patient conversation history.

pub mod cache;
pub mod engine;
pub mod generator;
pub mod response;
pub mod rewriter;
pub mod session;

pub use cache::{CacheKey, CacheStatsSnapshot, ResponseCache};
pub use engine::{ChatEngine, Collaborators};
pub use generator::{GeneratorConfig, ResponseGenerator};
pub use response::QueryResponse;
pub use rewriter::ContextRewriter;
pub use session::SessionStore;

use thiserror::Error;

/// Engine construction errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine configuration error: {0}")]
    Configuration(String),
}

impl From<EngineError> for renal_chat_core::Error {
    fn from(err: EngineError) -> Self {
        renal_chat_core::Error::Engine(err.to_string())
    }
}
