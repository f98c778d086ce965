//! Cache Module
//!
//! Provides the single-tier cache engine: entry storage, pluggable LRU/LFU
//! eviction, statistics and a thread-safe handle.

mod entry;
mod lfu;
mod lru;
mod policy;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EntryArena};
pub use lfu::FrequencyHeap;
pub use lru::RecencyList;
pub use policy::{EvictionPolicy, PolicyKind};
pub use shared::Cache;
pub use stats::{CacheStats, TieredStats};
pub use store::CacheStore;
