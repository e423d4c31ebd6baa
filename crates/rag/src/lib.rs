//! Retrieval with multi-variant search and cross-encoder re-ranking
//!
//! Features:
//! - Up to three query variants per request (base, entity-augmented,
//!   intent-templated)
//! - Intent-derived metadata filters on the vector query
//! - Merge with dedup by document id, variant provenance retained
//! - Logit-to-probability re-ranking via the logistic function
//! - Absolute relevance floor applied after re-ranking

pub mod search;
pub mod variants;

pub use search::{RetrievalEngine, SearchConfig, SearchOutcome};
pub use variants::{build_query_variants, filter_for_intent, QueryVariant, VariantKind};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Reranker error: {0}")]
    Reranker(String),
}

impl From<RagError> for renal_chat_core::Error {
    fn from(err: RagError) -> Self {
        renal_chat_core::Error::Rag(err.to_string())
    }
}
