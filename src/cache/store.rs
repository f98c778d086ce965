//! Cache Store Module
//!
//! Single-tier cache engine combining a key index, an entry arena and one
//! eviction policy. Every mutation of the index goes through the same few
//! private helpers that also update the policy, keeping the two in step.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, EntryArena, EvictionPolicy, PolicyKind};

// == Cache Store ==
/// Capacity-bounded key/value store parameterised by one eviction policy.
///
/// Not synchronised; see [`Cache`](crate::cache::Cache) for the shared handle.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key -> slot index
    index: HashMap<K, usize, RandomState>,
    /// Entry storage
    entries: EntryArena<K, V>,
    /// Ordering structure over the same slots
    policy: Box<dyn EvictionPolicy>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and policy.
    ///
    /// A capacity of zero yields a cache that stores nothing.
    pub fn new(capacity: usize, policy: PolicyKind) -> Self {
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            entries: EntryArena::with_capacity(capacity),
            policy: policy.build(capacity),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Get ==
    /// Retrieves a value by key, recording the access with the policy.
    ///
    /// A miss leaves the store untouched apart from the miss counter.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&slot) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.policy.touch(slot);
        self.entries.get(slot).map(|entry| &entry.value)
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// Updating an existing key replaces its value and touches it. Inserting
    /// a new key into a full store first evicts the policy's candidate, whose
    /// key is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        let is_new = self.capacity > 0 && !self.index.contains_key(&key);
        let evicted = self.admit(key, value);
        if is_new {
            self.stats.record_insertion();
        }
        evicted
    }

    /// `put` without the insertion counter, for entries moved in from
    /// another tier.
    pub(crate) fn admit(&mut self, key: K, value: V) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.entries.get_mut(slot) {
                entry.value = value;
            }
            self.policy.touch(slot);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let slot = self.entries.insert(CacheEntry::new(key.clone(), value));
        self.policy.insert(slot);
        self.index.insert(key, slot);

        self.stats.set_total_entries(self.index.len());
        evicted
    }

    // == Remove ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    // == Take ==
    /// Removes an entry by key and returns its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes an entry by key and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.release(key)?;
        self.stats.record_removal();
        Some(entry)
    }

    /// `remove_entry` without the removal counter, for entries moved out
    /// to another tier.
    pub(crate) fn release<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        let entry = self.detach(slot);

        self.stats.set_total_entries(self.index.len());
        Some((entry.key, entry.value))
    }

    // == Contains ==
    /// Checks for a key without touching it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Reads a value without touching it or updating statistics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &slot = self.index.get(key)?;
        self.entries.get(slot).map(|entry| &entry.value)
    }

    /// Key that the next overflowing insert would evict.
    pub fn eviction_candidate(&self) -> Option<&K> {
        let slot = self.policy.eviction_candidate()?;
        self.entries.get(slot).map(|entry| &entry.key)
    }

    /// Access counter of a key under the Frequency policy.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &slot = self.index.get(key)?;
        self.policy.frequency(slot)
    }

    /// Iterates over the stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }

    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.policy.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy.kind()
    }

    // == Consistency Check ==
    /// Panics if the key index, entry arena and policy disagree.
    ///
    /// Meant for tests; a failure here is a bug in this module.
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        assert!(
            self.index.len() <= self.capacity,
            "{} entries exceed capacity {}",
            self.index.len(),
            self.capacity
        );
        assert_eq!(self.index.len(), self.entries.len(), "index/arena size mismatch");
        assert_eq!(self.index.len(), self.policy.len(), "index/policy size mismatch");

        for (key, &slot) in &self.index {
            let entry = self.entries.get(slot);
            assert!(
                entry.is_some_and(|entry| entry.key == *key),
                "slot {slot} does not hold its indexed key"
            );
            assert!(self.policy.contains(slot), "slot {slot} missing from policy");
        }
    }

    // == Evict ==
    /// Removes the policy's eviction candidate and returns its key.
    fn evict(&mut self) -> Option<K> {
        let slot = self.policy.eviction_candidate()?;
        let entry = self.detach(slot);
        self.index.remove(&entry.key);
        self.stats.record_eviction();

        debug!(
            policy = %self.policy.kind(),
            capacity = self.capacity,
            "evicted entry to make room"
        );
        Some(entry.key)
    }

    /// Drops `slot` from the policy and the arena together.
    fn detach(&mut self, slot: usize) -> CacheEntry<K, V> {
        self.policy.remove(slot);
        match self.entries.remove(slot) {
            Some(entry) => entry,
            None => panic!("cache invariant violated: slot {slot} ordered but not stored"),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn lru(capacity: usize) -> CacheStore<String, String> {
        CacheStore::new(capacity, PolicyKind::Recency)
    }

    fn lfu(capacity: usize) -> CacheStore<u32, String> {
        CacheStore::new(capacity, PolicyKind::Frequency)
    }

    #[test]
    fn test_store_new() {
        let store = lru(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.policy(), PolicyKind::Recency);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = lru(100);

        assert_eq!(store.put("key1".to_string(), "value1".to_string()), None);
        let value = store.get("key1").cloned();

        assert_eq!(value.as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = lru(100);
        store.put("a".to_string(), "1".to_string());

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.len(), 1);
        store.assert_consistent();
    }

    #[test]
    fn test_store_remove() {
        let mut store = lru(100);

        store.put("key1".to_string(), "value1".to_string());
        assert!(store.remove("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        store.assert_consistent();
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store = lru(100);
        assert!(!store.remove("nonexistent"));
    }

    #[test]
    fn test_store_take_returns_value() {
        let mut store = lru(4);
        store.put("a".to_string(), "1".to_string());

        assert_eq!(store.take("a"), Some("1".to_string()));
        assert_eq!(store.take("a"), None);
        store.assert_consistent();
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = lru(100);

        store.put("key1".to_string(), "value1".to_string());
        assert_eq!(store.put("key1".to_string(), "value2".to_string()), None);

        assert_eq!(store.get("key1").map(String::as_str), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = lru(3);

        store.put("key1".to_string(), "value1".to_string());
        store.put("key2".to_string(), "value2".to_string());
        store.put("key3".to_string(), "value3".to_string());

        // Cache is full, adding key4 should evict key1 (oldest)
        let evicted = store.put("key4".to_string(), "value4".to_string());

        assert_eq!(evicted.as_deref(), Some("key1"));
        assert_eq!(store.len(), 3);
        assert!(!store.contains("key1"));
        assert!(store.contains("key2"));
        assert!(store.contains("key3"));
        assert!(store.contains("key4"));
        store.assert_consistent();
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = lru(2);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        assert_eq!(store.get("a").map(String::as_str), Some("1"));

        // b became LRU once a was touched
        let evicted = store.put("c".to_string(), "3".to_string());
        assert_eq!(evicted.as_deref(), Some("b"));
        assert!(store.contains("a"));
        assert!(store.contains("c"));
    }

    #[test]
    fn test_store_lru_touch_on_update() {
        let mut store = lru(2);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        store.put("a".to_string(), "10".to_string());

        assert_eq!(store.eviction_candidate().map(String::as_str), Some("b"));
    }

    #[test]
    fn test_store_contains_does_not_touch() {
        let mut store = lru(2);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        assert!(store.contains("a"));
        assert_eq!(store.peek("a").map(String::as_str), Some("1"));

        // a is still LRU
        let evicted = store.put("c".to_string(), "3".to_string());
        assert_eq!(evicted.as_deref(), Some("a"));
    }

    #[test]
    fn test_store_remove_frees_space() {
        let mut store = lru(3);
        for key in ["a", "b", "c"] {
            store.put(key.to_string(), key.to_uppercase());
        }

        assert!(store.remove("b"));
        assert_eq!(store.put("d".to_string(), "D".to_string()), None);
        assert!(!store.contains("b"));
        assert_eq!(store.len(), 3);
        store.assert_consistent();
    }

    #[test]
    fn test_store_zero_capacity() {
        let mut store = lru(0);

        assert_eq!(store.put("k".to_string(), "v".to_string()), None);
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty());
        assert_eq!(store.eviction_candidate(), None);
        store.assert_consistent();
    }

    #[test]
    fn test_store_lfu_tie_break() {
        let mut store = lfu(2);

        store.put(1, "10".to_string());
        store.put(2, "20".to_string());
        store.get(&1);
        store.get(&2);

        assert_eq!(store.frequency(&1), Some(2));
        assert_eq!(store.frequency(&2), Some(2));

        // Tie on frequency 2, key 1 touched earlier
        assert_eq!(store.put(3, "30".to_string()), Some(1));
        assert_eq!(store.get(&1), None);
        assert_eq!(store.get(&2).map(String::as_str), Some("20"));

        // Key 3 has frequency 1 and goes next
        assert_eq!(store.put(4, "40".to_string()), Some(3));
        store.assert_consistent();
    }

    #[test]
    fn test_store_lfu_update_counts_as_touch() {
        let mut store = lfu(2);

        store.put(1, "a".to_string());
        store.put(2, "b".to_string());
        store.put(1, "c".to_string());

        assert_eq!(store.frequency(&1), Some(2));
        assert_eq!(store.put(3, "d".to_string()), Some(2));
    }

    #[test]
    fn test_store_frequency_under_lru() {
        let mut store = lru(1);
        store.put("a".to_string(), "1".to_string());
        assert_eq!(store.frequency("a"), None);
    }

    #[test]
    fn test_store_stats() {
        let mut store = lru(1);

        store.put("key1".to_string(), "value1".to_string());
        store.get("key1"); // hit
        store.get("nonexistent"); // miss
        store.contains("key1"); // not counted
        store.put("key2".to_string(), "value2".to_string()); // eviction
        store.remove("key2");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.removals, 1);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.capacity, 1);
    }

    #[test]
    fn test_store_clear() {
        let mut store = lfu(4);
        store.put(1, "a".to_string());
        store.put(2, "b".to_string());

        store.clear();

        assert!(store.is_empty());
        assert!(!store.contains(&1));
        store.assert_consistent();

        store.put(3, "c".to_string());
        assert_eq!(store.frequency(&3), Some(1));
        store.assert_consistent();
    }

    #[test]
    fn test_store_release_and_admit_skip_counters() {
        let mut from = lru(2);
        let mut to = lru(1);
        from.put("a".to_string(), "1".to_string());
        to.put("b".to_string(), "2".to_string());

        let (key, value) = from.release("a").unwrap();
        assert_eq!(to.admit(key, value), Some("b".to_string()));

        let from_stats = from.stats();
        assert_eq!(from_stats.removals, 0);
        assert_eq!(from_stats.total_entries, 0);

        let to_stats = to.stats();
        assert_eq!(to_stats.insertions, 1);
        assert_eq!(to_stats.evictions, 1);
        assert_eq!(to_stats.total_entries, 1);
        from.assert_consistent();
        to.assert_consistent();
    }
}
