//! Core traits and types for the renal chat engine
//!
//! This crate provides the foundational types used across all other crates:
//! - Collaborator traits for pluggable backends (vector search, reranking,
//!   LLM chat, zero-shot classification, patient records)
//! - Language tags and translation-method markers
//! - Conversation types
//! - Chat message types for LLM calls
//! - Error types

pub mod chat;
pub mod conversation;
pub mod document;
pub mod error;
pub mod language;
pub mod traits;

pub use chat::{ChatMessage, ChatRole};
pub use conversation::{Turn, TurnRole};
pub use document::{MetadataFilter, QueryAnalysis, ScoredDocument, VectorHit};
pub use error::{Error, Result};
pub use language::{Lang, TranslationMethod};
pub use traits::{Classifier, LanguageModel, PatientStore, Reranker, VectorSearch};
