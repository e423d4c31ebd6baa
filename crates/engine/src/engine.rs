//! Query orchestrator
//!
//! Runs the straight-line pipeline for every request: detect language,
//! check the cache, bridge, contextualize, retrieve, fetch the patient
//! record, generate, style back, cache and record the exchange. The only
//! short-circuit is the cache hit; there are no retries and no
//! mid-pipeline aborts.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use renal_chat_core::{
    Classifier, Lang, LanguageModel, PatientStore, Reranker, TranslationMethod, Turn, VectorSearch,
};

use renal_chat_config::Settings;
use renal_chat_language::{detect_target_language, BridgeConfig, HybridBridge, StyleLayer};
use renal_chat_llm::{ChatClient, ChatClientConfig};
use renal_chat_rag::{RetrievalEngine, SearchConfig};

use crate::cache::{CacheKey, ResponseCache};
use crate::generator::{GeneratorConfig, ResponseGenerator};
use crate::response::QueryResponse;
use crate::rewriter::ContextRewriter;
use crate::session::SessionStore;
use crate::EngineError;

/// External systems the engine orchestrates
pub struct Collaborators {
    /// Chat-completion model used for bridging, rewriting, generation and
    /// styling
    pub model: Arc<dyn LanguageModel>,
    /// Vector store backing retrieval
    pub store: Arc<dyn VectorSearch>,
    /// Cross-encoder re-ranking model
    pub reranker: Arc<dyn Reranker>,
    /// Local zero-shot intent classifier
    pub classifier: Arc<dyn Classifier>,
    /// Patient record store
    pub patients: Arc<dyn PatientStore>,
}

/// The RAG orchestration engine
pub struct ChatEngine {
    bridge: HybridBridge,
    rewriter: ContextRewriter,
    retrieval: RetrievalEngine,
    generator: ResponseGenerator,
    style: StyleLayer,
    patients: Arc<dyn PatientStore>,
    cache: ResponseCache,
    sessions: SessionStore,
    max_context_documents: usize,
}

impl ChatEngine {
    pub fn new(collaborators: Collaborators, settings: &Settings) -> Self {
        let Collaborators {
            model,
            store,
            reranker,
            classifier,
            patients,
        } = collaborators;

        Self {
            bridge: HybridBridge::new(
                classifier.clone(),
                model.clone(),
                BridgeConfig::from(&settings.bridge),
            ),
            rewriter: ContextRewriter::new(model.clone())
                .with_temperature(settings.generation.style_temperature),
            retrieval: RetrievalEngine::new(
                store,
                reranker,
                classifier,
                SearchConfig::from(&settings.retrieval),
            ),
            generator: ResponseGenerator::new(model.clone(), GeneratorConfig::from(settings)),
            style: StyleLayer::new(model).with_temperature(settings.generation.style_temperature),
            patients,
            cache: ResponseCache::new(),
            sessions: SessionStore::new(settings.session.max_history_turns),
            max_context_documents: settings.session.max_context_documents,
        }
    }

    /// Build an engine whose language model is the production chat client
    /// configured in `settings.llm`
    pub fn from_settings(
        settings: &Settings,
        store: Arc<dyn VectorSearch>,
        reranker: Arc<dyn Reranker>,
        classifier: Arc<dyn Classifier>,
        patients: Arc<dyn PatientStore>,
    ) -> Result<Self, EngineError> {
        let client = ChatClient::new(ChatClientConfig::from(&settings.llm))
            .map_err(|e| EngineError::Configuration(e.to_string()))?;

        Ok(Self::new(
            Collaborators {
                model: Arc::new(client),
                store,
                reranker,
                classifier,
                patients,
            },
            settings,
        ))
    }

    /// Process one patient query end to end
    ///
    /// Always returns a well-formed payload; collaborator failures degrade
    /// per stage instead of failing the request.
    pub async fn process_query(&self, query: &str, patient_id: &str) -> QueryResponse {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let target_lang = detect_target_language(query);
        tracing::info!(
            %request_id,
            patient_id = %patient_id,
            lang = %target_lang,
            "processing query"
        );

        let data_version = match self.patients.data_version(patient_id).await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(
                    %request_id,
                    error = %e,
                    "patient version lookup failed, treating record as unversioned"
                );
                String::new()
            }
        };

        let key = CacheKey::new(patient_id, &data_version, target_lang, query);
        if let Some(cached) = self.cache.get(&key) {
            tracing::info!(%request_id, "cache hit");
            self.sessions
                .record_exchange(patient_id, query, &cached.response);
            return cached;
        }

        let history = self.sessions.history(patient_id);

        let (english_query, translation_method, translation_time) = if target_lang == Lang::Si {
            let outcome = self.bridge.bridge_to_english(query, &history).await;
            (
                outcome.english_query,
                outcome.method,
                outcome.elapsed.as_secs_f64(),
            )
        } else {
            (query.to_string(), TranslationMethod::None, 0.0)
        };

        let contextualized = self.rewriter.contextualize(&english_query, &history).await;
        let outcome = self.retrieval.search(&contextualized).await;

        let patient_context = match self.patients.context(patient_id).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!(
                    %request_id,
                    error = %e,
                    "patient context lookup failed, generating without record"
                );
                String::new()
            }
        };

        let english_response = match self
            .generator
            .generate(&english_query, &outcome.candidates, &patient_context, &history)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                // Degraded payloads are not cached and the exchange is not
                // recorded, so the next attempt re-runs the pipeline
                tracing::error!(%request_id, error = %e, "generation failed");
                return QueryResponse::degraded(
                    format!(
                        "Sorry, I could not answer right now ({}). Please try again.",
                        e
                    ),
                    target_lang,
                    translation_method,
                    translation_time,
                    outcome.analysis,
                );
            }
        };

        let response = self.style.style_back(&english_response, target_lang).await;

        let payload = QueryResponse {
            response,
            source_documents: outcome
                .candidates
                .iter()
                .take(self.max_context_documents)
                .map(|c| c.content.clone())
                .collect(),
            source_metadata: outcome
                .candidates
                .iter()
                .take(self.max_context_documents)
                .map(|c| c.metadata.clone())
                .collect(),
            nlu_analysis: outcome.analysis,
            target_lang,
            translation_method,
            translation_time,
        };

        self.cache.put(key, payload.clone());
        self.sessions
            .record_exchange(patient_id, query, &payload.response);

        tracing::info!(
            %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            sources = payload.source_documents.len(),
            method = %payload.translation_method,
            "query processed"
        );

        payload
    }

    /// Seed a patient's conversation history, e.g. when restoring a
    /// session from an external record
    ///
    /// Replaces whatever the session store holds; subsequent calls to
    /// [`process_query`](Self::process_query) read and extend it.
    pub fn seed_history(&self, patient_id: &str, history: Vec<Turn>) {
        self.sessions.seed(patient_id, history);
    }

    /// Drop every cached response for a patient
    pub fn invalidate_patient(&self, patient_id: &str) -> usize {
        self.cache.invalidate(patient_id)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
