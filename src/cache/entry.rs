//! Cache Entry Module
//!
//! Defines the unit of storage and the slot arena that owns it. Eviction
//! policies refer to entries by slot index, never by reference.

// == Cache Entry ==
/// Represents a single cache entry.
///
/// Policy metadata (recency links, frequency counters) lives in the policy,
/// keyed by the same slot index as the entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The entry key
    pub key: K,
    /// The stored value, replaced wholesale on update
    pub value: V,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

// == Entry Arena ==
/// Slot storage for entries with index reuse.
///
/// Freed slots are recycled before the backing vector grows, so slot indices
/// stay below the peak number of live entries.
#[derive(Debug)]
pub struct EntryArena<K, V> {
    slots: Vec<Option<CacheEntry<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> EntryArena<K, V> {
    /// Creates an empty arena sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    // == Insert ==
    /// Stores an entry and returns its slot index.
    pub fn insert(&mut self, entry: CacheEntry<K, V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    // == Remove ==
    /// Takes the entry out of `slot`, releasing the slot for reuse.
    pub fn remove(&mut self, slot: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        Some(entry)
    }

    pub fn get(&self, slot: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
