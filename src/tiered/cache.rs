//! Tiered Cache
//!
//! Composes several single-tier caches into one logical cache. Tier 0 is
//! the fastest and usually the smallest; new keys start in the last tier and
//! move toward tier 0 one step at a time whenever they are accessed.
//!
//! Every operation locks tiers strictly in ascending index order and keeps
//! them locked until it returns, so concurrent promotions through
//! overlapping tier ranges cannot deadlock or observe a half-moved key.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLockWriteGuard;
use tracing::{debug, info};

use crate::cache::{Cache, CacheStore, PolicyKind, TieredStats};
use crate::config::TierConfig;
use crate::error::{CacheError, Result};
use crate::tiered::TierView;

type TierGuard<'a, K, V> = RwLockWriteGuard<'a, CacheStore<K, V>>;

// == Tiered Cache ==
/// Ordered sequence of caches with promotion toward tier 0.
#[derive(Debug)]
pub struct TieredCache<K, V> {
    tiers: Vec<Cache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    promotions: AtomicU64,
}

impl<K, V> TieredCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Builds one tier per config entry, tier 0 first.
    pub fn new(configs: &[TierConfig]) -> Result<Self> {
        if configs.is_empty() {
            return Err(CacheError::NoTiers);
        }

        let tiers = configs
            .iter()
            .map(|tier| Cache::new(tier.capacity, tier.policy))
            .collect();

        info!(levels = configs.len(), "tiered cache initialized");
        Ok(Self {
            tiers,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
        })
    }

    /// Builds `levels` tiers sharing one capacity and policy.
    pub fn with_levels(levels: usize, capacity: usize, policy: PolicyKind) -> Result<Self> {
        Self::new(&vec![TierConfig::new(capacity, policy); levels])
    }

    // == Get ==
    /// Looks the key up tier by tier and promotes it on a hit.
    ///
    /// The hit tier's own `get` runs first so its policy sees the access,
    /// then the entry is moved up one tier at a time. A promotion can evict
    /// entries from faster tiers; those are dropped.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut guards: Vec<TierGuard<'_, K, V>> = Vec::with_capacity(self.tiers.len());

        for tier in &self.tiers {
            let mut guard = tier.write();
            if guard.contains(key) {
                let value = guard.get(key).cloned();
                guards.push(guard);

                let level = guards.len() - 1;
                self.promote(&mut guards, level, key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return value;
            }
            guards.push(guard);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    // == Put ==
    /// Updates the key where it lives and promotes it, or inserts a new key
    /// into the last tier.
    ///
    /// Returns every key evicted along the way, slowest tier first.
    pub fn put(&self, key: K, value: V) -> Vec<K> {
        let mut guards: Vec<TierGuard<'_, K, V>> = Vec::with_capacity(self.tiers.len());

        for tier in &self.tiers {
            let mut guard = tier.write();
            if guard.contains(&key) {
                let mut evicted: Vec<K> = guard.put(key.clone(), value).into_iter().collect();
                guards.push(guard);

                let level = guards.len() - 1;
                evicted.extend(self.promote(&mut guards, level, &key));
                return evicted;
            }
            guards.push(guard);
        }

        // Construction guarantees at least one tier
        match guards.last_mut() {
            Some(last) => last.put(key, value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    // == Remove ==
    /// Removes the key from every tier holding it.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guards: Vec<TierGuard<'_, K, V>> =
            self.tiers.iter().map(|tier| tier.write()).collect();

        guards
            .iter_mut()
            .fold(false, |removed, guard| guard.remove(key) || removed)
    }

    // == Contains ==
    /// Checks every tier for the key without touching it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tier_of(key).is_some()
    }

    /// Index of the fastest tier holding the key.
    pub fn tier_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut held = Vec::with_capacity(self.tiers.len());
        for (level, tier) in self.tiers.iter().enumerate() {
            let guard = tier.read();
            if guard.contains(key) {
                return Some(level);
            }
            held.push(guard);
        }
        None
    }

    /// Entries held across all tiers.
    pub fn len(&self) -> usize {
        let guards: Vec<_> = self.tiers.iter().map(|tier| tier.read()).collect();
        guards.iter().map(|guard| guard.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tiers.
    pub fn levels(&self) -> usize {
        self.tiers.len()
    }

    /// Read-only view of one tier.
    pub fn tier(&self, level: usize) -> Option<TierView<'_, K, V>> {
        self.tiers.get(level).map(TierView::new)
    }

    /// Removes every entry from every tier.
    pub fn clear(&self) {
        let mut guards: Vec<TierGuard<'_, K, V>> =
            self.tiers.iter().map(|tier| tier.write()).collect();
        for guard in guards.iter_mut() {
            guard.clear();
        }
    }

    // == Stats ==
    pub fn stats(&self) -> TieredStats {
        let guards: Vec<_> = self.tiers.iter().map(|tier| tier.read()).collect();
        let mut stats = TieredStats::new(guards.iter().map(|guard| guard.stats()).collect());
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats.promotions = self.promotions.load(Ordering::Relaxed);
        stats
    }

    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        for tier in &self.tiers {
            tier.assert_consistent();
        }
    }

    // == Promote ==
    /// Moves the key from tier `level` up to tier 0, one tier per step,
    /// through each receiving tier's own insert path. Moves are not counted
    /// as removals or insertions; evictions they cause are.
    ///
    /// `guards` must hold tiers `0..=level`. Promotion stops below a
    /// zero-capacity tier, which would otherwise drop the entry.
    fn promote<Q>(&self, guards: &mut [TierGuard<'_, K, V>], level: usize, key: &Q) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut evicted = Vec::new();

        for from in (1..=level).rev() {
            let to = from - 1;
            if guards[to].capacity() == 0 {
                break;
            }
            let Some((owned_key, value)) = guards[from].release(key) else {
                break;
            };

            if let Some(dropped) = guards[to].admit(owned_key, value) {
                evicted.push(dropped);
            }
            self.promotions.fetch_add(1, Ordering::Relaxed);
            debug!(from, to, "promoted entry");
        }

        evicted
    }
}
