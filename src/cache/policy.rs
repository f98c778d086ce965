//! Eviction Policy Module
//!
//! Defines the capability set every eviction policy provides and the
//! configuration-level policy selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{FrequencyHeap, RecencyList};
use crate::error::CacheError;

// == Eviction Policy ==
/// Ordering structure that decides which entry to evict on overflow.
///
/// Policies track entries by slot index. The owning store guarantees that
/// `insert` is only called for slots not yet tracked, and that `touch` and
/// `remove` are only called for tracked slots.
pub trait EvictionPolicy: fmt::Debug + Send + Sync {
    /// Which policy this is.
    fn kind(&self) -> PolicyKind;

    /// Starts tracking `slot` as a freshly inserted entry.
    fn insert(&mut self, slot: usize);

    /// Records an access or update of `slot`.
    fn touch(&mut self, slot: usize);

    /// Stops tracking `slot`.
    fn remove(&mut self, slot: usize);

    /// Slot that would be evicted next, without removing it.
    fn eviction_candidate(&self) -> Option<usize>;

    /// Whether `slot` is currently tracked.
    fn contains(&self, slot: usize) -> bool;

    /// Number of tracked slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access counter for `slot`, for policies that keep one.
    fn frequency(&self, _slot: usize) -> Option<u64> {
        None
    }

    /// Drops all tracked slots.
    fn clear(&mut self);
}

// == Policy Kind ==
/// Selects an eviction policy at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Least recently used entry is evicted first
    Recency,
    /// Least frequently used entry is evicted first, ties go to the
    /// least recently touched
    Frequency,
}

impl PolicyKind {
    /// Builds an empty ordering structure for a store of `capacity` entries.
    pub fn build(self, capacity: usize) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::Recency => Box::new(RecencyList::with_capacity(capacity)),
            PolicyKind::Frequency => Box::new(FrequencyHeap::with_capacity(capacity)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Recency => write!(f, "lru"),
            PolicyKind::Frequency => write!(f, "lfu"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" => Ok(PolicyKind::Recency),
            "lfu" | "frequency" => Ok(PolicyKind::Frequency),
            other => Err(CacheError::UnknownPolicy(other.to_string())),
        }
    }
}
