//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.
//! Counters are owned by the store they describe; nothing here is global.

use serde::Serialize;

// == Cache Stats ==
/// Tracks single-tier cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of lookups for absent keys
    pub misses: u64,
    /// Number of entries removed to make room for a new key
    pub evictions: u64,
    /// Number of new keys stored by callers, not by promotion
    pub insertions: u64,
    /// Number of entries removed explicitly, not by promotion
    pub removals: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Tiered Stats ==
/// Aggregated metrics for a tiered cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TieredStats {
    /// Per-tier statistics, tier 0 first
    pub tiers: Vec<CacheStats>,
    /// Lookups that found the key in some tier
    pub hits: u64,
    /// Lookups that found the key in no tier
    pub misses: u64,
    /// Single-tier promotion steps performed
    pub promotions: u64,
}

impl TieredStats {
    pub fn new(tiers: Vec<CacheStats>) -> Self {
        Self {
            tiers,
            ..Self::default()
        }
    }

    /// Hit rate of the tiered cache as a whole.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Entries held across all tiers.
    pub fn total_entries(&self) -> usize {
        self.tiers.iter().map(|t| t.total_entries).sum()
    }
}
