//! Query variant construction and intent-derived metadata filters
//!
//! Retrieval issues up to three variations of the same question so that a
//! single phrasing mismatch with the stored documents does not sink recall:
//! the base query, an entity-augmented rewrite, and an intent-templated
//! rewrite.

use renal_chat_core::{MetadataFilter, QueryAnalysis};

/// Intent tags mapped to the `content_type` metadata values their answers
/// live under
const INTENT_FILTERS: &[(&str, &[&str])] = &[
    ("ask_diet", &["dietary", "recommendation"]),
    ("ask_fluid", &["dietary", "recommendation"]),
    ("ask_medication", &["medication", "treatment"]),
    ("ask_treatment", &["treatment", "recommendation"]),
    ("ask_symptom", &["symptom", "medical"]),
    ("ask_lab", &["lab_results", "medical"]),
];

/// Which rewrite produced a query variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// The query as passed in
    Base,
    /// Base query with detected entity terms appended
    EntityAugmented,
    /// Template built from the detected intent topic
    IntentTemplated,
}

impl VariantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Base => "base",
            VariantKind::EntityAugmented => "entity_augmented",
            VariantKind::IntentTemplated => "intent_templated",
        }
    }
}

/// One query variation sent to the vector store
#[derive(Debug, Clone)]
pub struct QueryVariant {
    /// Text issued to the vector store
    pub text: String,
    /// Which rewrite produced it
    pub kind: VariantKind,
}

/// Metadata filter for a detected intent, when the intent has a known
/// content-type mapping
pub fn filter_for_intent(intent: &str) -> Option<MetadataFilter> {
    INTENT_FILTERS
        .iter()
        .find(|(tag, _)| *tag == intent)
        .map(|(_, values)| MetadataFilter::any_of("content_type", values.iter().copied()))
}

/// Build up to `max_variants` query variations
///
/// The base query always comes first; rewrites that collapse to an existing
/// variant's text are skipped rather than duplicated.
pub fn build_query_variants(
    query: &str,
    analysis: &QueryAnalysis,
    max_variants: usize,
) -> Vec<QueryVariant> {
    let base = query.trim().to_string();
    let mut variants = vec![QueryVariant {
        text: base.clone(),
        kind: VariantKind::Base,
    }];

    let entity_terms = analysis.entity_terms();
    if !entity_terms.is_empty() {
        let text = format!("{} {}", base, entity_terms.join(" "));
        push_unique(&mut variants, text, VariantKind::EntityAugmented);
    }

    // "ask_diet" -> topic "diet"; intents without an ask_ prefix (greetings,
    // chitchat) get no templated variant
    if let Some(topic) = analysis.intent.strip_prefix("ask_") {
        if !topic.is_empty() {
            let text = format!("chronic kidney disease {}", topic.replace('_', " "));
            push_unique(&mut variants, text, VariantKind::IntentTemplated);
        }
    }

    variants.truncate(max_variants);
    variants
}

fn push_unique(variants: &mut Vec<QueryVariant>, text: String, kind: VariantKind) {
    if !variants.iter().any(|v| v.text == text) {
        variants.push(QueryVariant { text, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn analysis(intent: &str, entities: &[(&str, &[&str])]) -> QueryAnalysis {
        let mut map = HashMap::new();
        for (category, terms) in entities {
            map.insert(
                category.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            );
        }
        QueryAnalysis {
            intent: intent.to_string(),
            confidence: 0.9,
            entities: map,
            translated_query: String::new(),
        }
    }

    #[test]
    fn test_base_variant_always_first() {
        let variants = build_query_variants("what can I eat", &QueryAnalysis::default(), 3);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].kind, VariantKind::Base);
        assert_eq!(variants[0].text, "what can I eat");
    }

    #[test]
    fn test_entity_and_intent_variants() {
        let analysis = analysis("ask_diet", &[("food", &["potassium", "salt"])]);
        let variants = build_query_variants("what can I eat", &analysis, 3);

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[1].kind, VariantKind::EntityAugmented);
        assert_eq!(variants[1].text, "what can I eat potassium salt");
        assert_eq!(variants[2].kind, VariantKind::IntentTemplated);
        assert_eq!(variants[2].text, "chronic kidney disease diet");
    }

    #[test]
    fn test_variant_cap() {
        let analysis = analysis("ask_diet", &[("food", &["salt"])]);
        let variants = build_query_variants("what can I eat", &analysis, 2);
        assert_eq!(variants.len(), 2);
    }

    #[test]
    fn test_non_ask_intent_gets_no_template() {
        let analysis = analysis("greeting", &[]);
        let variants = build_query_variants("hello", &analysis, 3);
        assert_eq!(variants.len(), 1);
    }

    #[test]
    fn test_filter_for_intent() {
        let filter = filter_for_intent("ask_diet").unwrap();
        assert_eq!(filter.field, "content_type");
        assert_eq!(filter.any_of, vec!["dietary", "recommendation"]);

        assert!(filter_for_intent("greeting").is_none());
        assert!(filter_for_intent("").is_none());
    }
}
