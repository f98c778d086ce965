//! Shared Cache Module
//!
//! Thread-safe handle around a single [`CacheStore`]. Every operation that
//! can touch the policy runs under the write lock; only pure reads share.

use std::borrow::Borrow;
use std::hash::Hash;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::cache::{CacheStats, CacheStore, PolicyKind};

// == Cache ==
/// Single-tier cache safe to share between threads (wrap in `Arc`).
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: RwLock<CacheStore<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a new cache with the given capacity and policy.
    pub fn new(capacity: usize, policy: PolicyKind) -> Self {
        info!(capacity, %policy, "creating cache");
        Self::from_store(CacheStore::new(capacity, policy))
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<K, V>) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }

    /// Retrieves a clone of the value and touches the entry.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.write().get(key).cloned()
    }

    /// Stores a key-value pair, returning the evicted key if any.
    pub fn put(&self, key: K, value: V) -> Option<K> {
        self.inner.write().put(key, value)
    }

    /// Removes a key, returning whether it was present.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Removes a key and returns its value.
    pub fn take<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().take(key)
    }

    /// Checks for a key under the shared lock, without touching it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains(key)
    }

    /// Reads a clone of the value without touching it.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    pub fn eviction_candidate(&self) -> Option<K> {
        self.inner.read().eviction_candidate().cloned()
    }

    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().frequency(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn policy(&self) -> PolicyKind {
        self.inner.read().policy()
    }

    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        self.inner.read().assert_consistent();
    }

    /// Exclusive access for multi-step operations spanning several caches.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CacheStore<K, V>> {
        self.inner.write()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CacheStore<K, V>> {
        self.inner.read()
    }
}
