//! LRU Policy Module
//!
//! Implements Least Recently Used ordering as a doubly linked list whose
//! links are slot indices rather than pointers.

use crate::cache::{EvictionPolicy, PolicyKind};

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Every operation is O(1).
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Per-slot links, `None` when the slot is not tracked
    links: Vec<Option<Link>>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list sized for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Slots from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head, move |&slot| {
            self.links.get(slot).copied().flatten().and_then(|l| l.next)
        })
    }

    fn link(&self, slot: usize) -> Option<Link> {
        self.links.get(slot).copied().flatten()
    }

    fn set_prev(&mut self, slot: usize, prev: Option<usize>) {
        if let Some(Some(link)) = self.links.get_mut(slot) {
            link.prev = prev;
        }
    }

    fn set_next(&mut self, slot: usize, next: Option<usize>) {
        if let Some(Some(link)) = self.links.get_mut(slot) {
            link.next = next;
        }
    }

    // == Push Front ==
    /// Links an already-allocated slot at the MRU end.
    fn push_front(&mut self, slot: usize) {
        self.links[slot] = Some(Link {
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old_head) => self.set_prev(old_head, Some(slot)),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    // == Unlink ==
    /// Detaches `slot` from its neighbours, leaving its link allocated.
    fn unlink(&mut self, slot: usize) {
        let Some(link) = self.link(slot) else {
            return;
        };

        match link.prev {
            Some(prev) => self.set_next(prev, link.next),
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.set_prev(next, link.prev),
            None => self.tail = link.prev,
        }
    }
}

impl EvictionPolicy for RecencyList {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Recency
    }

    fn insert(&mut self, slot: usize) {
        if slot >= self.links.len() {
            self.links.resize(slot + 1, None);
        }
        debug_assert!(self.links[slot].is_none(), "slot {slot} already tracked");
        self.push_front(slot);
        self.len += 1;
    }

    fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) || self.link(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn remove(&mut self, slot: usize) {
        if self.link(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.links[slot] = None;
        self.len -= 1;
    }

    fn eviction_candidate(&self) -> Option<usize> {
        self.tail
    }

    fn contains(&self, slot: usize) -> bool {
        self.link(slot).is_some()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}
