//! Collaborator traits consumed by the orchestration engine
//!
//! The embedding store, re-ranking model, zero-shot classifier and patient
//! record store are external systems; the engine only depends on these
//! interfaces, which makes every collaborator substitutable with a fake in
//! tests.

use async_trait::async_trait;

use crate::chat::ChatMessage;
use crate::document::{MetadataFilter, QueryAnalysis, VectorHit};
use crate::Result;

/// Vector-store similarity search
///
/// Implementations wrap the embedding backend (e.g. a ChromaDB sidecar).
///
/// # Example
///
/// ```ignore
/// let hits = store.query("fluid intake ckd", 5, None).await?;
/// for hit in hits {
///     println!("{} {}", hit.distance, hit.id);
/// }
/// ```
#[async_trait]
pub trait VectorSearch: Send + Sync + 'static {
    /// Run a similarity query
    ///
    /// # Arguments
    /// * `text` - Query text
    /// * `top_k` - Number of hits to return
    /// * `filter` - Optional metadata constraint
    ///
    /// # Returns
    /// Hits ordered by ascending distance; an empty store yields an empty
    /// list, not an error.
    async fn query(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorHit>>;
}

/// Cross-encoder re-ranking model
pub trait Reranker: Send + Sync + 'static {
    /// Score every (query, document) pair
    ///
    /// # Returns
    /// Raw logits, one per document, same order as the input. Callers are
    /// responsible for squashing logits into probabilities.
    fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>>;
}

/// Chat-completion language model
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Run a single chat completion
    ///
    /// Errors on any transport failure (timeout, non-2xx, malformed body);
    /// callers decide how to degrade.
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;

    /// Model name for logging
    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// Local zero-shot intent classifier
///
/// Embedding-similarity classification against English anchor phrases per
/// intent category. Local and synchronous; no network call.
pub trait Classifier: Send + Sync + 'static {
    fn classify(&self, text: &str) -> Result<QueryAnalysis>;
}

/// Patient record store
///
/// The engine never mutates patient data; it reads a context summary for
/// prompt injection and an opaque version token for cache invalidation.
#[async_trait]
pub trait PatientStore: Send + Sync + 'static {
    /// Versioned string summary of the patient (demographics, diagnosis, labs)
    async fn context(&self, patient_id: &str) -> Result<String>;

    /// Opaque token that changes whenever the patient's record is updated
    async fn data_version(&self, patient_id: &str) -> Result<String>;
}
