//! Property-Based Tests for Cache Module
//!
//! Uses proptest to replay random operation sequences against the store and
//! against a naive reference model of each policy.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{CacheStore, PolicyKind};

// == Strategies ==
/// Small key space so sequences hit, update and evict often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..12
}

fn policy_strategy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![Just(PolicyKind::Recency), Just(PolicyKind::Frequency)]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32 },
    Get { key: u8 },
    Remove { key: u8 },
    Contains { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Contains { key }),
    ]
}

// == Reference Model ==
/// Linear-scan model of both policies.
#[derive(Debug)]
struct Model {
    policy: PolicyKind,
    capacity: usize,
    tick: u64,
    /// key -> (value, frequency, last_touched)
    entries: HashMap<u8, (u32, u64, u64)>,
}

impl Model {
    fn new(capacity: usize, policy: PolicyKind) -> Self {
        Self {
            policy,
            capacity,
            tick: 0,
            entries: HashMap::new(),
        }
    }

    fn touch(&mut self, key: u8) {
        self.tick += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.1 += 1;
            entry.2 = self.tick;
        }
    }

    fn victim(&self) -> Option<u8> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| match self.policy {
                PolicyKind::Recency => (0, entry.2),
                PolicyKind::Frequency => (entry.1, entry.2),
            })
            .map(|(&key, _)| key)
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let value = self.entries.get(&key)?.0;
        self.touch(key);
        Some(value)
    }

    fn put(&mut self, key: u8, value: u32) -> Option<u8> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.0 = value;
            self.touch(key);
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            let victim = self.victim();
            if let Some(victim) = victim {
                self.entries.remove(&victim);
            }
            victim
        } else {
            None
        };
        self.tick += 1;
        self.entries.insert(key, (value, 1, self.tick));
        evicted
    }

    fn remove(&mut self, key: u8) -> bool {
        self.entries.remove(&key).is_some()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* sequence of operations, every indexed key has exactly one
    // node in the policy and the entry count never exceeds capacity.
    #[test]
    fn prop_bijection_and_capacity(
        capacity in 0usize..6,
        policy in policy_strategy(),
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store: CacheStore<u8, u32> = CacheStore::new(capacity, policy);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => { store.put(key, value); }
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Remove { key } => { store.remove(&key); }
                CacheOp::Contains { key } => { store.contains(&key); }
            }
            store.assert_consistent();
            prop_assert!(store.len() <= capacity);
        }
    }

    // *For any* sequence of operations, the store returns the same values,
    // evicts the same keys and holds the same key set as the reference model.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        policy in policy_strategy(),
        ops in prop::collection::vec(cache_op_strategy(), 1..150)
    ) {
        let mut store: CacheStore<u8, u32> = CacheStore::new(capacity, policy);
        let mut model = Model::new(capacity, policy);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    prop_assert_eq!(store.put(key, value), model.put(key, value));
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).copied(), model.get(key));
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key), model.remove(key));
                }
                CacheOp::Contains { key } => {
                    prop_assert_eq!(store.contains(&key), model.entries.contains_key(&key));
                }
            }
            prop_assert_eq!(store.eviction_candidate().copied(), model.victim());
        }

        let mut keys: Vec<u8> = store.keys().copied().collect();
        keys.sort_unstable();
        let mut expected: Vec<u8> = model.entries.keys().copied().collect();
        expected.sort_unstable();
        prop_assert_eq!(keys, expected);
    }

    // *For any* store state, a Get on an absent key changes neither the size
    // nor the next eviction candidate.
    #[test]
    fn prop_miss_is_idempotent(
        policy in policy_strategy(),
        keys in prop::collection::vec(0u8..8, 1..20),
        absent in 100u8..200
    ) {
        let mut store: CacheStore<u8, u32> = CacheStore::new(4, policy);
        for key in keys {
            store.put(key, u32::from(key));
        }

        let len = store.len();
        let candidate = store.eviction_candidate().copied();

        prop_assert_eq!(store.get(&absent), None);
        prop_assert_eq!(store.len(), len);
        prop_assert_eq!(store.eviction_candidate().copied(), candidate);
    }

    // *For any* filled LFU store where one key is accessed more than the
    // others, inserting a new key evicts the least recently touched of the
    // least frequent keys and never the hot key.
    #[test]
    fn prop_lfu_never_evicts_hot_key(
        capacity in 2usize..8,
        hot_index in 0usize..8,
        extra in 1usize..5
    ) {
        let hot = (hot_index % capacity) as u8;
        let mut store: CacheStore<u8, u32> = CacheStore::new(capacity, PolicyKind::Frequency);

        for key in 0..capacity as u8 {
            store.put(key, 0);
        }
        for _ in 0..extra {
            store.get(&hot);
        }

        let expected = if hot == 0 { 1 } else { 0 };
        prop_assert_eq!(store.put(200, 0), Some(expected));
        prop_assert!(store.contains(&hot));
    }

    // *For any* zero-capacity store, Put followed by Get always misses.
    #[test]
    fn prop_zero_capacity_never_stores(
        policy in policy_strategy(),
        key in key_strategy(),
        value in any::<u32>()
    ) {
        let mut store: CacheStore<u8, u32> = CacheStore::new(0, policy);
        prop_assert_eq!(store.put(key, value), None);
        prop_assert_eq!(store.get(&key), None);
        prop_assert!(store.is_empty());
    }
}
