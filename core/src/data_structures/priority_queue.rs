//! Binary min-heap priority queue for the shortest-path open set
//!
//! Array-backed complete binary tree: the children of slot `i` live at
//! `2i + 1` and `2i + 2`, its parent at `(i - 1) / 2`. Entries are
//! `(node, key)` pairs ordered by ascending key; ties are broken
//! arbitrarily.
//!
//! The queue has no decrease-key. A node whose cost improves is
//! pushed again with the smaller key and the older entry stays behind as a
//! stale entry. The search engine recognises stale entries when they surface
//! and discards them (lazy deletion), so the queue itself never needs to
//! know where a node currently sits.
//!
//! Storage is a `Vec`, which grows by doubling; pushes are never dropped.
//! Popping an empty queue returns [`PriorityQueueError::EmptyQueue`].

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Cost, NodeId};

/// Priority queue contract violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriorityQueueError {
    #[error("pop_min called on an empty queue")]
    EmptyQueue,

    #[error("Heap invariant violated between parent {parent} and child {child}")]
    HeapInvariantViolation { parent: usize, child: usize },
}

/// Heap slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry<K> {
    node: NodeId,
    key: K,
}

/// Operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub pushes: u64,
    pub pops: u64,
    pub comparisons: u64,
    pub peak_len: usize,
}

/// Binary min-heap keyed by `K` (path cost by default)
#[derive(Debug, Clone)]
pub struct MinPriorityQueue<K = Cost> {
    heap: Vec<HeapEntry<K>>,
    stats: QueueStats,
}

impl<K: Ord + Copy> MinPriorityQueue<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Preallocates room for `capacity` entries; the queue still grows past it
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            stats: QueueStats::default(),
        }
    }

    /// Inserts `node` with priority `key` in O(log n)
    pub fn push(&mut self, node: NodeId, key: K) {
        self.heap.push(HeapEntry { node, key });
        self.stats.pushes += 1;
        self.stats.peak_len = self.stats.peak_len.max(self.heap.len());

        let last = self.heap.len() - 1;
        self.sift_up(last);
    }

    /// Removes and returns the entry with the smallest key in O(log n)
    pub fn pop_min(&mut self) -> Result<(NodeId, K), PriorityQueueError> {
        if self.heap.is_empty() {
            return Err(PriorityQueueError::EmptyQueue);
        }

        let root = self.heap.swap_remove(0);
        self.stats.pops += 1;

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Ok((root.node, root.key))
    }

    /// Smallest entry without removing it
    pub fn peek_min(&self) -> Option<(NodeId, K)> {
        self.heap.first().map(|entry| (entry.node, entry.key))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops all entries, keeping the allocation and the counters
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    /// Checks the heap property for every parent/child pair
    pub fn validate(&self) -> Result<(), PriorityQueueError> {
        for child in 1..self.heap.len() {
            let parent = (child - 1) / 2;
            if self.heap[child].key < self.heap[parent].key {
                return Err(PriorityQueueError::HeapInvariantViolation { parent, child });
            }
        }
        Ok(())
    }

    /// Moves the entry at `position` towards the root while it is strictly
    /// smaller than its parent
    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;

            if !self.less(position, parent) {
                break;
            }

            self.heap.swap(position, parent);
            position = parent;
        }
    }

    /// Moves the entry at `position` towards the leaves, swapping with the
    /// smaller child while that child is smaller
    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();

        loop {
            let mut smallest = position;
            let left = 2 * position + 1;
            let right = 2 * position + 2;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }

            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest == position {
                break;
            }

            self.heap.swap(position, smallest);
            position = smallest;
        }
    }

    #[inline]
    fn less(&mut self, a: usize, b: usize) -> bool {
        self.stats.comparisons += 1;
        self.heap[a].key < self.heap[b].key
    }
}

impl<K: Ord + Copy> Default for MinPriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> Extend<(NodeId, K)> for MinPriorityQueue<K> {
    fn extend<I: IntoIterator<Item = (NodeId, K)>>(&mut self, iter: I) {
        for (node, key) in iter {
            self.push(node, key);
        }
    }
}
