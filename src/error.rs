//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. Misses, evictions and
//! zero-capacity no-ops are ordinary outcomes and never show up here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for construction, configuration and command parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A tiered cache needs at least one tier
    #[error("Tiered cache requires at least one tier")]
    NoTiers,

    /// Policy name not recognised
    #[error("Unknown eviction policy: {0}")]
    UnknownPolicy(String),

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed replay command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
