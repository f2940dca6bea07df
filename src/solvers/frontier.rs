//! Priority structures backing the cost-aware searches.
//!
//! Both structures break priority ties by insertion order, so that two entries with the
//! same score come out in the order they were discovered.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, BinaryHeap, HashMap},
};

use crate::grid::Cell;

/// Min-heap that never removes or updates entries. Superseded entries stay in the heap
/// and have to be filtered by the caller when they are popped.
#[derive(Debug)]
pub(crate) struct LazyHeap<K: Ord> {
    // Using Reverse to turn the max-heap into a min-heap
    heap: BinaryHeap<Reverse<(K, u64, Cell)>>,
    next_seq: u64,
}

impl<K: Ord + Copy> LazyHeap<K> {
    pub fn new() -> Self {
        LazyHeap {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, key: K, cell: Cell) {
        self.heap.push(Reverse((key, self.next_seq, cell)));
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<(K, Cell)> {
        self.heap.pop().map(|Reverse((key, _, cell))| (key, cell))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Min-queue holding at most one entry per cell. Re-keying an entry keeps its original
/// insertion rank for tie-breaking.
#[derive(Debug)]
pub(crate) struct IndexedQueue<K: Ord> {
    order: BTreeSet<(K, u64, Cell)>,
    index: HashMap<Cell, (K, u64)>,
    next_seq: u64,
}

impl<K: Ord + Copy> IndexedQueue<K> {
    pub fn new() -> Self {
        IndexedQueue {
            order: BTreeSet::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    /// Adds a new entry. Returns `false` and leaves the queue untouched if the cell is
    /// already queued.
    pub fn insert(&mut self, cell: Cell, key: K) -> bool {
        if self.contains(cell) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert((key, seq, cell));
        self.index.insert(cell, (key, seq));
        true
    }

    /// Re-keys the cell's entry in place, or inserts it if the cell is not queued.
    pub fn upsert(&mut self, cell: Cell, key: K) {
        match self.index.get_mut(&cell) {
            Some((old_key, seq)) => {
                self.order.remove(&(*old_key, *seq, cell));
                self.order.insert((key, *seq, cell));
                *old_key = key;
            }
            None => {
                self.insert(cell, key);
            }
        }
    }

    pub fn pop(&mut self) -> Option<(K, Cell)> {
        let (key, _, cell) = self.order.pop_first()?;
        self.index.remove(&cell);
        Some((key, cell))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.order.len(), self.index.len());
        self.order.len()
    }
}
