//! Min-heap of `(f32 key, Coord value)` with FIFO tie-break on equal keys.
//!
//! Built on `std::collections::BinaryHeap` (a max-heap), inverted via
//! `Reverse` and keyed by `(key, seq)` so two entries with equal cost pop in
//! push order. `remove` is implemented by lazy deletion: removed entries are
//! marked in a tombstone set and skipped as they surface at the top of the
//! heap, giving `O(log n)` amortized behavior without an index-mapped heap.
//! The tombstone set is keyed on each entry's unique `seq`, not on
//! `(cost, coord)` — two live entries can share a `(cost, coord)` pair (a
//! `remove` immediately followed by a `push` of the same key, as D*-Lite's
//! `update_vertex` does), and only `seq` tells them apart.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use super::coord::Coord;

#[derive(Debug, Clone, Copy)]
struct Key {
    cost: f32,
    seq: u64,
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}
impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .partial_cmp(&other.cost)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: Key,
    coord: Coord,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    tombstones: HashSet<u64>,
    next_seq: u64,
    len: usize,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cost: f32, coord: Coord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            key: Key { cost, seq },
            coord,
        }));
        self.len += 1;
    }

    fn drop_tombstoned_top(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if self.tombstones.contains(&top.key.seq) {
                let Reverse(popped) = self.heap.pop().unwrap();
                self.tombstones.remove(&popped.key.seq);
            } else {
                break;
            }
        }
    }

    pub fn pop(&mut self) -> Option<(f32, Coord)> {
        self.drop_tombstoned_top();
        let Reverse(entry) = self.heap.pop()?;
        self.len -= 1;
        Some((entry.key.cost, entry.coord))
    }

    pub fn peek(&mut self) -> Option<(f32, Coord)> {
        self.drop_tombstoned_top();
        self.heap.peek().map(|Reverse(e)| (e.key.cost, e.coord))
    }

    pub fn peek_cost(&mut self) -> Option<f32> {
        self.peek().map(|(c, _)| c)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.heap
            .iter()
            .any(|Reverse(e)| e.coord == coord && !self.tombstones.contains(&e.key.seq))
    }

    /// Removes one live entry matching both `cost` and `coord`, if present.
    /// Tombstoned by the entry's own `seq` rather than by `(cost, coord)`, so
    /// a later `push` of the same `(cost, coord)` pair (a fresh `seq`) is
    /// never mistaken for the removed entry.
    pub fn remove(&mut self, cost: f32, coord: Coord) {
        let target = self.heap.iter().find_map(|Reverse(e)| {
            if e.coord == coord && e.key.cost == cost && !self.tombstones.contains(&e.key.seq) {
                Some(e.key.seq)
            } else {
                None
            }
        });
        if let Some(seq) = target {
            self.tombstones.insert(seq);
            self.len = self.len.saturating_sub(1);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops the `n` highest-cost live entries. Used by SMA*'s memory bound.
    pub fn trim_worst(&mut self, n: usize) {
        let mut live: Vec<Entry> = self
            .heap
            .drain()
            .map(|Reverse(e)| e)
            .filter(|e| !self.tombstones.contains(&e.key.seq))
            .collect();
        live.sort_by(|a, b| b.key.cmp(&a.key));
        let drop_count = n.min(live.len());
        live.drain(0..drop_count);
        self.tombstones.clear();
        self.len = live.len();
        self.heap = live.into_iter().map(Reverse).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_pop_in_fifo_order() {
        let mut pq = PriorityQueue::new();
        pq.push(1.0, Coord::new(0, 0));
        pq.push(1.0, Coord::new(1, 0));
        pq.push(1.0, Coord::new(2, 0));
        assert_eq!(pq.pop(), Some((1.0, Coord::new(0, 0))));
        assert_eq!(pq.pop(), Some((1.0, Coord::new(1, 0))));
        assert_eq!(pq.pop(), Some((1.0, Coord::new(2, 0))));
    }

    #[test]
    fn remove_retires_matching_entry() {
        let mut pq = PriorityQueue::new();
        pq.push(2.0, Coord::new(0, 0));
        pq.push(1.0, Coord::new(1, 0));
        pq.remove(1.0, Coord::new(1, 0));
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.pop(), Some((2.0, Coord::new(0, 0))));
        assert!(pq.is_empty());
    }

    #[test]
    fn remove_then_push_same_key_leaves_the_new_entry_live() {
        let mut pq = PriorityQueue::new();
        pq.push(1.0, Coord::new(1, 0));
        pq.remove(1.0, Coord::new(1, 0));
        pq.push(1.0, Coord::new(1, 0));
        assert!(pq.contains(Coord::new(1, 0)));
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.pop(), Some((1.0, Coord::new(1, 0))));
    }

    #[test]
    fn trim_worst_drops_highest_cost_entries() {
        let mut pq = PriorityQueue::new();
        pq.push(1.0, Coord::new(0, 0));
        pq.push(5.0, Coord::new(1, 0));
        pq.push(3.0, Coord::new(2, 0));
        pq.trim_worst(1);
        assert_eq!(pq.len(), 2);
        assert_eq!(pq.pop(), Some((1.0, Coord::new(0, 0))));
        assert_eq!(pq.pop(), Some((3.0, Coord::new(2, 0))));
    }
}
