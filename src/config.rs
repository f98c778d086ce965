//! Configuration Module
//!
//! Handles loading cache layout configuration from environment variables.
//! Capacity, policy and tier count are fixed once a cache is built.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::PolicyKind;
use crate::error::{CacheError, Result};

/// Tier layout used when `CACHE_TIERS` is unset or invalid.
pub const DEFAULT_TIERS: &str = "lru:64,lfu:256";

// == Tier Config ==
/// Capacity and eviction policy of one cache tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Maximum number of entries the tier can hold
    pub capacity: usize,
    /// Eviction policy of the tier
    pub policy: PolicyKind,
}

impl TierConfig {
    pub fn new(capacity: usize, policy: PolicyKind) -> Self {
        Self { capacity, policy }
    }
}

impl fmt::Display for TierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.policy, self.capacity)
    }
}

impl FromStr for TierConfig {
    type Err = CacheError;

    /// Parses `"<policy>:<capacity>"`, e.g. `lru:128`.
    fn from_str(s: &str) -> Result<Self> {
        let (policy, capacity) = s.trim().split_once(':').ok_or_else(|| {
            CacheError::InvalidConfig(format!("expected <policy>:<capacity>, got '{s}'"))
        })?;

        let policy = policy.parse()?;
        let capacity = capacity
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig(format!("invalid capacity '{capacity}'")))?;

        Ok(Self { capacity, policy })
    }
}

/// Cache layout configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tiers from fastest (index 0) to slowest
    pub tiers: Vec<TierConfig>,
    /// Print a statistics report when the replay input ends
    pub report_stats: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TIERS` - Comma separated tier specs (default: `lru:64,lfu:256`)
    /// - `CACHE_REPORT_STATS` - Emit final stats report (default: true)
    pub fn from_env() -> Self {
        let tiers = match env::var("CACHE_TIERS") {
            Ok(raw) => Self::parse_tiers(&raw).unwrap_or_else(|err| {
                warn!("Ignoring CACHE_TIERS='{}': {}", raw, err);
                Self::default_tiers()
            }),
            Err(_) => Self::default_tiers(),
        };

        let report_stats = match env::var("CACHE_REPORT_STATS") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring CACHE_REPORT_STATS='{}': expected true or false", raw);
                true
            }),
            Err(_) => true,
        };

        Self {
            tiers,
            report_stats,
        }
    }

    /// Parses a comma separated list of tier specs.
    pub fn parse_tiers(raw: &str) -> Result<Vec<TierConfig>> {
        let tiers = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<TierConfig>>>()?;

        if tiers.is_empty() {
            return Err(CacheError::NoTiers);
        }
        Ok(tiers)
    }

    fn default_tiers() -> Vec<TierConfig> {
        vec![
            TierConfig::new(64, PolicyKind::Recency),
            TierConfig::new(256, PolicyKind::Frequency),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tiers: Self::default_tiers(),
            report_stats: true,
        }
    }
}
