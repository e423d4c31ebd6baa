//! Shared fake collaborators for engine integration tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use renal_chat_config::Settings;
use renal_chat_core::{
    ChatMessage, Classifier, Error, LanguageModel, MetadataFilter, PatientStore, QueryAnalysis,
    Reranker, Result, VectorHit, VectorSearch,
};
use renal_chat_engine::{ChatEngine, Collaborators};

pub const ENGLISH_ANSWER: &str =
    "Chronic kidney disease means your kidneys are slowly losing function. \
     Contact your kidney clinic if symptoms continue.";

pub const SINHALA_ANSWER: &str = "වකුගඩු රෝගය කියන්නේ වකුගඩු ක්‍රමයෙන් දුර්වල වීමයි.";

/// Routes replies by the system prompt of each call and counts every path
pub struct FakeModel {
    pub generation_calls: AtomicUsize,
    pub translation_calls: AtomicUsize,
    pub style_calls: AtomicUsize,
    pub rewrite_calls: AtomicUsize,
    pub fail_generation: AtomicBool,
}

impl FakeModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            generation_calls: AtomicUsize::new(0),
            translation_calls: AtomicUsize::new(0),
            style_calls: AtomicUsize::new(0),
            rewrite_calls: AtomicUsize::new(0),
            fail_generation: AtomicBool::new(false),
        })
    }

    pub fn generation_count(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        let system = &messages[0].content;

        if system.contains("kidney-care assistant") {
            self.generation_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_generation.load(Ordering::SeqCst) {
                return Err(Error::Llm("API error (HTTP 503): overloaded".to_string()));
            }
            Ok(ENGLISH_ANSWER.to_string())
        } else if system.contains("spoken Sinhala") {
            self.style_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SINHALA_ANSWER.to_string())
        } else if system.contains("translate Sinhala") {
            self.translation_calls.fetch_add(1, Ordering::SeqCst);
            Ok("leg swelling kidney".to_string())
        } else if system.contains("standalone") {
            self.rewrite_calls.fetch_add(1, Ordering::SeqCst);
            Ok(messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default())
        } else {
            Err(Error::Llm(format!("unexpected system prompt: {}", system)))
        }
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

pub struct FakeStore {
    pub hits: Vec<VectorHit>,
}

#[async_trait]
impl VectorSearch for FakeStore {
    async fn query(
        &self,
        _text: &str,
        _top_k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorHit>> {
        Ok(self.hits.clone())
    }
}

pub struct FakeReranker;

impl Reranker for FakeReranker {
    fn score(&self, _query: &str, documents: &[String]) -> Result<Vec<f32>> {
        Ok(vec![2.0; documents.len()])
    }
}

pub struct FakeClassifier {
    pub confidence: f32,
}

impl Classifier for FakeClassifier {
    fn classify(&self, _text: &str) -> Result<QueryAnalysis> {
        let mut entities = HashMap::new();
        entities.insert("symptom".to_string(), vec!["swelling".to_string()]);
        Ok(QueryAnalysis {
            intent: "ask_symptom".to_string(),
            confidence: self.confidence,
            entities,
            translated_query: "my legs are swollen".to_string(),
        })
    }
}

pub struct FakePatients {
    version: Mutex<String>,
}

impl FakePatients {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            version: Mutex::new("v1".to_string()),
        })
    }

    /// Simulate an update to the underlying patient record
    pub fn bump_version(&self) {
        let mut version = self.version.lock();
        version.push('+');
    }
}

#[async_trait]
impl PatientStore for FakePatients {
    async fn context(&self, _patient_id: &str) -> Result<String> {
        Ok("Stage 3 CKD, eGFR 45, on amlodipine".to_string())
    }

    async fn data_version(&self, _patient_id: &str) -> Result<String> {
        Ok(self.version.lock().clone())
    }
}

pub fn knowledge_hits() -> Vec<VectorHit> {
    vec![
        VectorHit {
            id: "ckd-overview".to_string(),
            content: "CKD is a gradual loss of kidney function over months or years.".to_string(),
            metadata: HashMap::new(),
            distance: 0.1,
        },
        VectorHit {
            id: "ckd-salt".to_string(),
            content: "CKD patients should limit salt to under 5g per day.".to_string(),
            metadata: HashMap::new(),
            distance: 0.2,
        },
    ]
}

pub struct TestBed {
    pub engine: ChatEngine,
    pub model: Arc<FakeModel>,
    pub patients: Arc<FakePatients>,
}

pub fn test_bed(classifier_confidence: f32, hits: Vec<VectorHit>) -> TestBed {
    let model = FakeModel::new();
    let patients = FakePatients::new();

    let engine = ChatEngine::new(
        Collaborators {
            model: model.clone(),
            store: Arc::new(FakeStore { hits }),
            reranker: Arc::new(FakeReranker),
            classifier: Arc::new(FakeClassifier {
                confidence: classifier_confidence,
            }),
            patients: patients.clone(),
        },
        &Settings::default(),
    );

    TestBed {
        engine,
        model,
        patients,
    }
}
