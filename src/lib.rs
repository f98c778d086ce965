//! tiercache - A capacity-bounded in-process cache engine
//!
//! Provides single-tier caches with LRU or LFU eviction, and a tiered cache
//! that promotes entries toward its fastest tier on access.

pub mod cache;
pub mod config;
pub mod error;
pub mod replay;
pub mod tiered;

pub use cache::{Cache, CacheStats, CacheStore, EvictionPolicy, PolicyKind, TieredStats};
pub use config::{Config, TierConfig};
pub use error::{CacheError, Result};
pub use tiered::{TierView, TieredCache};
