//! Open and closed sets with dominance checks.
//!
//! Open is a min-heap keyed on `(f, insertion order)`, so the cheapest node
//! pops first and ties go to whichever was inserted earlier. Closed keeps
//! every archived node for the rest of the search.
//!
//! Dominance only needs the lowest `f` ever recorded for a fill vector
//! across Open and Closed, so that is kept in a single map instead of
//! scanning both sets. Entries are never removed: Closed grows for as long
//! as the search runs.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::node::{Fills, Node, NodeArena, NodeId};

/// Ordering key for the open heap: lower `f` first, then older insertion.
#[derive(Debug, Clone, Copy)]
struct OpenKey {
    f: f64,
    order: u64,
}

impl PartialEq for OpenKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenKey {}

impl PartialOrd for OpenKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.order.cmp(&other.order))
    }
}

/// `BinaryHeap` is a max-heap, so entries wrap their key in `Reverse`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    key: Reverse<OpenKey>,
    id: NodeId,
}

/// Frontier (open set) plus explored (closed) set
#[derive(Debug, Default)]
pub struct Frontier {
    open: BinaryHeap<OpenEntry>,
    closed: Vec<NodeId>,
    best_f: HashMap<Fills, f64>,
    next_order: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an Open or Closed node with the same fills already has `f`
    /// at or below `f`.
    pub fn is_dominated(&self, fills: &[u64], f: f64) -> bool {
        self.best_f.get(fills).is_some_and(|&best| best <= f)
    }

    /// Whether a strictly cheaper node with the same fills has been recorded
    /// since `node` entered Open. Such a node lost its dominance race and
    /// must not be expanded.
    pub fn is_superseded(&self, node: &Node) -> bool {
        self.best_f
            .get(node.state().fills())
            .is_some_and(|&best| best < node.f())
    }

    /// Insert `node` into Open unless it is dominated.
    ///
    /// Returns the arena id of the inserted node, or `None` if it was
    /// discarded.
    pub fn try_insert(&mut self, arena: &mut NodeArena, node: Node) -> Option<NodeId> {
        if self.is_dominated(node.state().fills(), node.f()) {
            return None;
        }

        let f = node.f();
        self.record(node.state().fills(), f);
        let id = arena.push(node);

        let order = self.next_order;
        self.next_order += 1;
        self.open.push(OpenEntry {
            key: Reverse(OpenKey { f, order }),
            id,
        });
        self.high_water = self.high_water.max(self.open.len());

        Some(id)
    }

    /// Remove and return the open node with the smallest `f`.
    ///
    /// `None` means the frontier is exhausted.
    pub fn pop_min(&mut self) -> Option<NodeId> {
        self.open.pop().map(|entry| entry.id)
    }

    /// Archive a node into Closed.
    pub fn close(&mut self, arena: &NodeArena, id: NodeId) {
        let node = &arena[id];
        self.record(node.state().fills(), node.f());
        self.closed.push(id);
    }

    /// Move every open node with `g > lower_bound` into Closed.
    ///
    /// Returns how many nodes were displaced.
    pub fn close_stale(&mut self, arena: &NodeArena, lower_bound: u32) -> usize {
        if self.open.iter().all(|entry| arena[entry.id].g() <= lower_bound) {
            return 0;
        }

        let (kept, stale): (Vec<OpenEntry>, Vec<OpenEntry>) = std::mem::take(&mut self.open)
            .into_iter()
            .partition(|entry| arena[entry.id].g() <= lower_bound);

        self.open = kept.into_iter().collect();
        let displaced = stale.len();
        for entry in stale {
            self.closed.push(entry.id);
        }
        displaced
    }

    fn record(&mut self, fills: &[u64], f: f64) {
        match self.best_f.get_mut(fills) {
            Some(best) => *best = best.min(f),
            None => {
                self.best_f.insert(Fills::from_slice(fills), f);
            }
        }
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn is_open_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Ids currently in Open, in no particular order
    pub fn open_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.open.iter().map(|entry| entry.id)
    }

    /// Ids archived in Closed, oldest first
    pub fn closed_ids(&self) -> &[NodeId] {
        &self.closed
    }

    /// Largest size Open ever reached
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::State;
    use crate::pour::Pour;

    fn node(fills: &[u64], g: u32, h: f64) -> Node {
        Node::root(State::new(fills.iter().copied().collect(), g), h)
    }

    #[test]
    fn test_pop_returns_lowest_f_first() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        frontier.try_insert(&mut arena, node(&[1, 0, 0], 1, 9.0));
        let best = frontier.try_insert(&mut arena, node(&[2, 0, 0], 1, 2.0));
        frontier.try_insert(&mut arena, node(&[3, 0, 0], 1, 5.0));

        assert_eq!(frontier.pop_min(), best);
        assert_eq!(frontier.open_len(), 2);
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let first = frontier.try_insert(&mut arena, node(&[1, 0, 0], 2, 1.0));
        let second = frontier.try_insert(&mut arena, node(&[2, 0, 0], 1, 2.0));
        let third = frontier.try_insert(&mut arena, node(&[3, 0, 0], 3, 0.0));

        assert_eq!(frontier.pop_min(), first);
        assert_eq!(frontier.pop_min(), second);
        assert_eq!(frontier.pop_min(), third);
        assert_eq!(frontier.pop_min(), None, "empty frontier signals exhaustion");
    }

    #[test]
    fn test_dominated_candidate_is_discarded() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        assert!(frontier.try_insert(&mut arena, node(&[3, 2, 0], 2, 1.0)).is_some());

        // same fills, same f: discarded
        assert!(frontier.try_insert(&mut arena, node(&[3, 2, 0], 2, 1.0)).is_none());
        // same fills, worse f: discarded
        assert!(frontier.try_insert(&mut arena, node(&[3, 2, 0], 5, 1.0)).is_none());
        // step count is not part of identity, only f matters
        assert!(frontier.try_insert(&mut arena, node(&[3, 2, 0], 1, 1.0)).is_some());
        assert_eq!(frontier.open_len(), 2);
        assert_eq!(arena.len(), 2, "discarded candidates never reach the arena");
    }

    #[test]
    fn test_closed_nodes_dominate_candidates() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let id = frontier.try_insert(&mut arena, node(&[0, 5, 0], 1, 0.0)).unwrap();
        assert_eq!(frontier.pop_min(), Some(id));
        frontier.close(&arena, id);

        assert!(frontier.is_open_empty());
        assert!(frontier.try_insert(&mut arena, node(&[0, 5, 0], 3, 0.0)).is_none());
        assert_eq!(frontier.closed_ids(), &[id]);
    }

    #[test]
    fn test_superseded_entry_is_detected() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let slow = frontier.try_insert(&mut arena, node(&[1, 5, 0], 6, 0.0)).unwrap();
        let fast = frontier.try_insert(&mut arena, node(&[1, 5, 0], 4, 0.0)).unwrap();

        assert!(frontier.is_superseded(&arena[slow]));
        assert!(!frontier.is_superseded(&arena[fast]));
    }

    #[test]
    fn test_close_stale_partitions_on_g() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let parent = arena.push(node(&[0, 0, 0], 0, 0.0));
        for (fills, g) in [([3, 0, 0], 2), ([0, 5, 0], 5), ([3, 5, 0], 7), ([1, 0, 0], 6)] {
            let state = State::new(fills.iter().copied().collect(), g);
            frontier.try_insert(&mut arena, Node::child(state, parent, Pour::Fill(0), 0.0));
        }

        let displaced = frontier.close_stale(&arena, 5);
        assert_eq!(displaced, 2);
        assert_eq!(frontier.open_len(), 2);
        assert!(frontier.open_ids().all(|id| arena[id].g() <= 5));
        assert_eq!(frontier.closed_len(), 2);
        assert!(frontier.closed_ids().iter().all(|&id| arena[id].g() > 5));

        assert_eq!(frontier.close_stale(&arena, 5), 0, "second pass is a no-op");
    }

    #[test]
    fn test_high_water_tracks_max_size() {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        frontier.try_insert(&mut arena, node(&[1, 0, 0], 1, 0.0));
        frontier.try_insert(&mut arena, node(&[2, 0, 0], 1, 0.0));
        frontier.try_insert(&mut arena, node(&[3, 0, 0], 1, 0.0));
        let _ = frontier.pop_min();

        assert_eq!(frontier.high_water(), 3);
    }
}
