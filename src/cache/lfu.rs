//! LFU Policy Module
//!
//! Implements Least Frequently Used ordering on an indexed binary min-heap.
//! Each tracked slot remembers its heap position, so repositioning and
//! arbitrary removal are O(log n) without scanning.

use crate::cache::{EvictionPolicy, PolicyKind};

/// Frequency metadata for one tracked slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    /// Accesses and updates, starting at 1 on insert
    frequency: u64,
    /// Logical timestamp of the last touch, unique per policy instance
    last_touched: u64,
}

// == Frequency Heap ==
/// Min-heap ordered by `(frequency, last_touched)`.
///
/// `last_touched` comes from a per-instance monotonic counter, so no two
/// tracked slots ever compare equal and the eviction order is deterministic.
#[derive(Debug, Default)]
pub struct FrequencyHeap {
    /// Heap of slot indices
    heap: Vec<usize>,
    /// Slot -> position in `heap`
    positions: Vec<Option<usize>>,
    /// Slot -> rank, meaningful only while the slot is tracked
    ranks: Vec<Rank>,
    /// Logical clock
    tick: u64,
}

impl FrequencyHeap {
    // == Constructor ==
    /// Creates an empty heap sized for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            ranks: Vec::with_capacity(capacity),
            tick: 0,
        }
    }

    /// Logical timestamp of the last touch of `slot`.
    pub fn last_touched(&self, slot: usize) -> Option<u64> {
        self.position(slot).map(|_| self.ranks[slot].last_touched)
    }

    fn position(&self, slot: usize) -> Option<usize> {
        self.positions.get(slot).copied().flatten()
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn rank_at(&self, pos: usize) -> Rank {
        self.ranks[self.heap[pos]]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = Some(a);
        self.positions[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.rank_at(pos) >= self.rank_at(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;

            if left < len && self.rank_at(left) < self.rank_at(smallest) {
                smallest = left;
            }
            if right < len && self.rank_at(right) < self.rank_at(smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

impl EvictionPolicy for FrequencyHeap {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Frequency
    }

    fn insert(&mut self, slot: usize) {
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, None);
            self.ranks.resize(
                slot + 1,
                Rank {
                    frequency: 0,
                    last_touched: 0,
                },
            );
        }
        debug_assert!(self.positions[slot].is_none(), "slot {slot} already tracked");

        self.ranks[slot] = Rank {
            frequency: 1,
            last_touched: self.next_tick(),
        };
        let pos = self.heap.len();
        self.heap.push(slot);
        self.positions[slot] = Some(pos);
        self.sift_up(pos);
    }

    fn touch(&mut self, slot: usize) {
        let Some(pos) = self.position(slot) else {
            return;
        };
        let tick = self.next_tick();
        let rank = &mut self.ranks[slot];
        rank.frequency += 1;
        rank.last_touched = tick;
        // Rank only grows, so the slot can only move down
        self.sift_down(pos);
    }

    fn remove(&mut self, slot: usize) {
        let Some(pos) = self.position(slot) else {
            return;
        };
        self.positions[slot] = None;

        let last = self.heap.len() - 1;
        if pos != last {
            self.heap.swap(pos, last);
            self.positions[self.heap[pos]] = Some(pos);
        }
        self.heap.pop();

        if pos < self.heap.len() {
            self.sift_up(pos);
            self.sift_down(pos);
        }
    }

    fn eviction_candidate(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    fn contains(&self, slot: usize) -> bool {
        self.position(slot).is_some()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn frequency(&self, slot: usize) -> Option<u64> {
        self.position(slot).map(|_| self.ranks[slot].frequency)
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
        self.ranks.clear();
    }
}
