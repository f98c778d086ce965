//! Tier View
//!
//! Read-only window onto one tier of a [`TieredCache`](super::TieredCache).
//! Writes must go through the tiered cache so a key never lives in two
//! tiers at once.

use std::borrow::Borrow;
use std::hash::Hash;

use crate::cache::{Cache, CacheStats, PolicyKind};

/// Inspection handle for a single tier. Nothing here touches the policy.
#[derive(Debug, Clone, Copy)]
pub struct TierView<'a, K, V> {
    tier: &'a Cache<K, V>,
}

impl<'a, K, V> TierView<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    pub(crate) fn new(tier: &'a Cache<K, V>) -> Self {
        Self { tier }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tier.contains(key)
    }

    /// Reads a clone of the value without touching it.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.tier.peek(key)
    }

    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tier.frequency(key)
    }

    pub fn eviction_candidate(&self) -> Option<K> {
        self.tier.eviction_candidate()
    }

    pub fn len(&self) -> usize {
        self.tier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tier.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tier.capacity()
    }

    pub fn policy(&self) -> PolicyKind {
        self.tier.policy()
    }

    pub fn stats(&self) -> CacheStats {
        self.tier.stats()
    }
}
