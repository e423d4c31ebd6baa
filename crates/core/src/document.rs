//! Retrieval document and analysis types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata filter applied to a vector-store query
///
/// A hit matches when the metadata value under `field` equals any of the
/// listed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Metadata field name
    pub field: String,
    /// Accepted values for the field
    pub any_of: Vec<String>,
}

impl MetadataFilter {
    /// Filter on a single accepted value
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            any_of: vec![value.into()],
        }
    }

    /// Filter on any of several accepted values
    pub fn any_of(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            field: field.into(),
            any_of: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A raw hit returned by the vector-store collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    /// Document ID
    pub id: String,
    /// Document content
    pub content: String,
    /// Document metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Embedding distance reported by the store (lower is closer)
    pub distance: f32,
}

/// A retrieval candidate after fusion and re-ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Document ID
    pub id: String,
    /// Document content
    pub content: String,
    /// Document metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Relevance probability in [0, 1] after re-ranking
    pub score: f32,
    /// Index of the query variant that first surfaced this document
    pub variant: usize,
}

/// Output of the local zero-shot classifier
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueryAnalysis {
    /// Detected intent (e.g. "ask_diet")
    pub intent: String,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    /// Detected entities grouped by category
    #[serde(default)]
    pub entities: HashMap<String, Vec<String>>,
    /// English rendering of the query produced by the classifier
    pub translated_query: String,
}

impl QueryAnalysis {
    /// Entity terms across all categories, categories in sorted order so the
    /// result is deterministic
    pub fn entity_terms(&self) -> Vec<&str> {
        let mut categories: Vec<&String> = self.entities.keys().collect();
        categories.sort();
        categories
            .into_iter()
            .flat_map(|c| self.entities[c].iter().map(String::as_str))
            .collect()
    }
}
