//! Replay Output Models
//!
//! Defines the JSON objects written for each replayed command.

use serde::Serialize;

use crate::cache::TieredStats;

/// One line of replay output, tagged by operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Response {
    Get {
        key: String,
        found: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Put {
        key: String,
        evicted: Vec<String>,
    },
    Remove {
        key: String,
        removed: bool,
    },
    Contains {
        key: String,
        found: bool,
    },
    Tier {
        key: String,
        tier: Option<usize>,
    },
    Stats(StatsReport),
    Error {
        error: String,
    },
}

impl Response {
    /// Creates an error line from any displayable error.
    pub fn error(err: impl std::fmt::Display) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}

/// Statistics report for the whole cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Overall hit rate (0.0 - 1.0)
    pub hit_rate: f64,
    /// Entries across all tiers
    pub total_entries: usize,
    #[serde(flatten)]
    pub stats: TieredStats,
}

impl From<TieredStats> for StatsReport {
    fn from(stats: TieredStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            total_entries: stats.total_entries(),
            stats,
        }
    }
}
