//! Response cache with invalidation-by-construction
//!
//! Keys fingerprint the patient id, the patient-data version token, the
//! target language and the normalized query. A new data version or a
//! different language silently changes every affected key, so stale
//! entries become unreachable without any explicit eviction. The cache
//! lives for the process lifetime; nothing is persisted.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use renal_chat_core::Lang;

use crate::response::QueryResponse;

/// Cache key for one (patient, version, language, query) combination
///
/// The patient id is kept in clear alongside the fingerprint so the
/// explicit bulk-delete path can scan by patient. The scan is O(n) over
/// the cache, acceptable at the single-digit-thousands entry counts this
/// service sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    patient_id: String,
    fingerprint: u64,
}

impl CacheKey {
    /// Build a key from the raw request facts
    ///
    /// The query is normalized (trimmed, lower-cased) so whitespace and
    /// casing variants of the same question share an entry.
    pub fn new(patient_id: &str, data_version: &str, lang: Lang, query: &str) -> Self {
        let normalized = query.trim().to_lowercase();
        let material = format!(
            "{}:{}:{}:{}",
            patient_id,
            data_version,
            lang.as_str(),
            normalized
        );

        let mut hasher = DefaultHasher::new();
        material.hash(&mut hasher);

        Self {
            patient_id: patient_id.to_string(),
            fingerprint: hasher.finish(),
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }
}

/// In-memory response cache
pub struct ResponseCache {
    entries: DashMap<CacheKey, QueryResponse>,
    stats: CacheStats,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Look up a cached payload
    pub fn get(&self, key: &CacheKey) -> Option<QueryResponse> {
        let payload = self.entries.get(key).map(|entry| entry.value().clone());

        if payload.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }

        payload
    }

    /// Store a payload
    pub fn put(&self, key: CacheKey, payload: QueryResponse) {
        self.entries.insert(key, payload);
        self.stats.record_write();
    }

    /// Drop every cached entry for a patient
    ///
    /// Returns the number of entries removed. The lazy version-token path
    /// makes this unnecessary for correctness; it exists for operational
    /// use (record corrections, consent withdrawal).
    pub fn invalidate(&self, patient_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.patient_id() != patient_id);
        let removed = before - self.entries.len();
        self.stats.record_invalidations(removed as u64);

        tracing::debug!(patient_id = %patient_id, removed, "cache invalidated for patient");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the hit/miss/write counters
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock-free cache counters
#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStatsSnapshot {
            hits,
            misses,
            writes: self.writes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

/// Serializable view of the cache counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub invalidations: u64,
    pub hit_rate: f64,
}
