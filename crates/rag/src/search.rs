//! Retrieval fusion and cross-encoder re-ranking
//!
//! Issues up to three query variants against the vector store, merges the
//! hits with id-level dedup, re-scores every surviving candidate with the
//! cross-encoder and applies the absolute relevance floor. An empty store,
//! a failed variant or an empty merge all degrade to an empty candidate
//! list; retrieval never fails a request.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use renal_chat_core::{Classifier, QueryAnalysis, Reranker, ScoredDocument, VectorSearch};

use renal_chat_config::constants::retrieval as defaults;
use renal_chat_config::RetrievalSettings;

use crate::variants::{build_query_variants, filter_for_intent};
use crate::RagError;

/// Retrieval configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hits requested from the vector store per query variant
    pub variant_top_k: usize,
    /// Candidates surviving into the final result
    pub final_top_k: usize,
    /// Maximum query variants issued per request
    pub max_query_variants: usize,
    /// Post-sigmoid probability at or below which a candidate is discarded
    pub relevance_floor: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            variant_top_k: defaults::VARIANT_TOP_K,
            final_top_k: defaults::FINAL_TOP_K,
            max_query_variants: defaults::MAX_QUERY_VARIANTS,
            relevance_floor: defaults::RELEVANCE_FLOOR,
        }
    }
}

impl From<&RetrievalSettings> for SearchConfig {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            variant_top_k: settings.variant_top_k,
            final_top_k: settings.final_top_k,
            max_query_variants: settings.max_query_variants,
            relevance_floor: settings.relevance_floor,
        }
    }
}

/// Result of one retrieval pass
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Candidates surviving fusion, re-ranking and the relevance floor
    pub candidates: Vec<ScoredDocument>,
    /// Classifier output for the query
    pub analysis: QueryAnalysis,
}

/// A merged hit awaiting re-ranking
struct MergedCandidate {
    id: String,
    content: String,
    metadata: HashMap<String, serde_json::Value>,
    variant: usize,
}

/// Multi-variant retrieval engine
pub struct RetrievalEngine {
    store: Arc<dyn VectorSearch>,
    reranker: Arc<dyn Reranker>,
    classifier: Arc<dyn Classifier>,
    config: SearchConfig,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<dyn VectorSearch>,
        reranker: Arc<dyn Reranker>,
        classifier: Arc<dyn Classifier>,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            reranker,
            classifier,
            config,
        }
    }

    /// Retrieve and re-rank candidates for a query
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let analysis = match self.classifier.classify(query) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "classifier failed, searching with base query only");
                QueryAnalysis::default()
            }
        };

        let variants = build_query_variants(query, &analysis, self.config.max_query_variants);
        let filter = filter_for_intent(&analysis.intent);

        let mut merged: Vec<MergedCandidate> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, variant) in variants.iter().enumerate() {
            let hits = match self
                .store
                .query(&variant.text, self.config.variant_top_k, filter.as_ref())
                .await
            {
                Ok(hits) => hits,
                Err(e) => {
                    let err = RagError::VectorStore(e.to_string());
                    tracing::warn!(
                        error = %err,
                        variant = variant.kind.as_str(),
                        "skipping variant"
                    );
                    continue;
                }
            };

            // First occurrence wins; later variants only contribute new ids
            for hit in hits {
                if seen.insert(hit.id.clone()) {
                    merged.push(MergedCandidate {
                        id: hit.id,
                        content: hit.content,
                        metadata: hit.metadata,
                        variant: index,
                    });
                }
            }
        }

        if merged.is_empty() {
            tracing::debug!(query = %query, "retrieval produced no candidates");
            return SearchOutcome {
                candidates: Vec::new(),
                analysis,
            };
        }

        let documents: Vec<String> = merged.iter().map(|c| c.content.clone()).collect();
        let logits = match self.reranker.score(query, &documents) {
            Ok(logits) => logits,
            Err(e) => {
                let err = RagError::Reranker(e.to_string());
                tracing::warn!(error = %err, "keeping merge order with neutral scores");
                vec![0.0; merged.len()]
            }
        };

        let mut candidates: Vec<ScoredDocument> = merged
            .into_iter()
            .zip(logits)
            .map(|(c, logit)| ScoredDocument {
                id: c.id,
                content: c.content,
                metadata: c.metadata,
                score: sigmoid(logit),
                variant: c.variant,
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.retain(|c| c.score > self.config.relevance_floor);
        candidates.truncate(self.config.final_top_k);

        tracing::debug!(
            query = %query,
            variants = variants.len(),
            survivors = candidates.len(),
            "retrieval finished"
        );

        SearchOutcome {
            candidates,
            analysis,
        }
    }
}

/// Squash a raw cross-encoder logit into a probability so scores are
/// comparable in [0, 1] regardless of model scale
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use renal_chat_core::{MetadataFilter, Result, VectorHit};

    fn hit(id: &str, content: &str) -> VectorHit {
        VectorHit {
            id: id.to_string(),
            content: content.to_string(),
            metadata: HashMap::new(),
            distance: 0.2,
        }
    }

    /// Returns the same hits for every variant and records each call
    struct RecordingStore {
        hits: Vec<VectorHit>,
        calls: Mutex<Vec<(String, Option<MetadataFilter>)>>,
    }

    impl RecordingStore {
        fn with_hits(hits: Vec<VectorHit>) -> Self {
            Self {
                hits,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorSearch for RecordingStore {
        async fn query(
            &self,
            text: &str,
            _top_k: usize,
            filter: Option<&MetadataFilter>,
        ) -> Result<Vec<VectorHit>> {
            self.calls
                .lock()
                .push((text.to_string(), filter.cloned()));
            Ok(self.hits.clone())
        }
    }

    /// Logit derived from the document text: "weak" documents score far
    /// below the relevance floor, everything else well above it
    struct ContentReranker;

    impl Reranker for ContentReranker {
        fn score(&self, _query: &str, documents: &[String]) -> Result<Vec<f32>> {
            Ok(documents
                .iter()
                .map(|doc| if doc.contains("weak") { -6.0 } else { 3.0 })
                .collect())
        }
    }

    struct FailingReranker;

    impl Reranker for FailingReranker {
        fn score(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>> {
            Err(RagError::Reranker("model not loaded".to_string()).into())
        }
    }

    struct FixedClassifier {
        analysis: QueryAnalysis,
    }

    impl Classifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<QueryAnalysis> {
            Ok(self.analysis.clone())
        }
    }

    fn diet_analysis() -> QueryAnalysis {
        let mut entities = HashMap::new();
        entities.insert("food".to_string(), vec!["potassium".to_string()]);
        QueryAnalysis {
            intent: "ask_diet".to_string(),
            confidence: 0.9,
            entities,
            translated_query: String::new(),
        }
    }

    fn engine(store: Arc<RecordingStore>, reranker: Arc<dyn Reranker>) -> RetrievalEngine {
        RetrievalEngine::new(
            store,
            reranker,
            Arc::new(FixedClassifier {
                analysis: diet_analysis(),
            }),
            SearchConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_dedup_across_variants() {
        let store = Arc::new(RecordingStore::with_hits(vec![
            hit("a", "limit potassium intake"),
            hit("b", "reduce salt"),
        ]));
        let engine = engine(store.clone(), Arc::new(ContentReranker));

        let outcome = engine.search("what can I eat").await;

        // three variants all returned the same two ids
        assert_eq!(store.calls.lock().len(), 3);
        assert_eq!(outcome.candidates.len(), 2);
        let ids: Vec<&str> = outcome.candidates.iter().map(|c| c.id.as_str()).collect();
        assert!(ids.contains(&"a") && ids.contains(&"b"));
    }

    #[tokio::test]
    async fn test_first_occurrence_keeps_variant_provenance() {
        let store = Arc::new(RecordingStore::with_hits(vec![hit("a", "doc")]));
        let engine = engine(store, Arc::new(ContentReranker));

        let outcome = engine.search("what can I eat").await;

        assert_eq!(outcome.candidates[0].variant, 0);
    }

    #[tokio::test]
    async fn test_relevance_floor_drops_weak_candidates() {
        let store = Arc::new(RecordingStore::with_hits(vec![
            hit("strong", "limit potassium"),
            hit("junk", "weak unrelated text"),
        ]));
        let engine = engine(store, Arc::new(ContentReranker));

        let outcome = engine.search("what can I eat").await;

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].id, "strong");
        assert!(outcome.candidates[0].score > 0.9);
    }

    #[tokio::test]
    async fn test_floor_may_empty_the_list() {
        let store = Arc::new(RecordingStore::with_hits(vec![
            hit("j1", "weak one"),
            hit("j2", "weak two"),
        ]));
        let engine = engine(store, Arc::new(ContentReranker));

        let outcome = engine.search("what can I eat").await;

        assert!(outcome.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_is_not_an_error() {
        let store = Arc::new(RecordingStore::with_hits(Vec::new()));
        let engine = engine(store, Arc::new(ContentReranker));

        let outcome = engine.search("what can I eat").await;

        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.analysis.intent, "ask_diet");
    }

    #[tokio::test]
    async fn test_intent_filter_reaches_the_store() {
        let store = Arc::new(RecordingStore::with_hits(Vec::new()));
        let engine = engine(store.clone(), Arc::new(ContentReranker));

        engine.search("what can I eat").await;

        let calls = store.calls.lock();
        let filter = calls[0].1.as_ref().unwrap();
        assert_eq!(filter.field, "content_type");
        assert_eq!(filter.any_of, vec!["dietary", "recommendation"]);
    }

    #[tokio::test]
    async fn test_reranker_failure_degrades_to_neutral_scores() {
        let store = Arc::new(RecordingStore::with_hits(vec![hit("a", "doc")]));
        let engine = engine(store, Arc::new(FailingReranker));

        let outcome = engine.search("what can I eat").await;

        assert_eq!(outcome.candidates.len(), 1);
        assert!((outcome.candidates[0].score - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
        assert!((sigmoid(0.0) - 0.5).abs() < f32::EPSILON);
    }
}
