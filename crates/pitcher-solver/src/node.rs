//! Search state, immutable nodes and the arena that owns them.
//!
//! Nodes never point at each other directly. Each one records the
//! [`NodeId`] of its parent, and the [`NodeArena`] keeps every node alive
//! until the search is dropped, so a solution path can always be unwound
//! even after its ancestors have left the frontier.

use smallvec::SmallVec;

use crate::pour::Pour;

/// Fill levels, one per pitcher followed by the goal container.
///
/// Puzzles rarely have more than a handful of pitchers, so fills stay
/// inline and states clone without allocating.
pub type Fills = SmallVec<[u64; 8]>;

/// Container fills plus the number of pours taken to reach them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    fills: Fills,
    steps: u32,
}

impl State {
    pub fn new(fills: Fills, steps: u32) -> Self {
        debug_assert!(!fills.is_empty(), "a state always holds the goal container");
        Self { fills, steps }
    }

    /// All fills, goal container last
    pub fn fills(&self) -> &[u64] {
        &self.fills
    }

    /// Fills of the bounded pitchers only
    pub fn pitchers(&self) -> &[u64] {
        &self.fills[..self.goal_index()]
    }

    /// Fill of the unbounded goal container
    pub fn goal(&self) -> u64 {
        self.fills[self.goal_index()]
    }

    pub fn goal_index(&self) -> usize {
        self.fills.len() - 1
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Total water held across every container, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.fills
            .iter()
            .fold(0u64, |total, &fill| total.saturating_add(fill))
    }

    /// Copy of this state one step later with `change` applied to the fills.
    pub fn successor(&self, change: impl FnOnce(&mut Fills)) -> Self {
        let mut fills = self.fills.clone();
        change(&mut fills);
        Self {
            fills,
            steps: self.steps + 1,
        }
    }
}

/// Stable index of a node inside a [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One search-tree entry.
///
/// `f == g + h` holds from construction on; there is no way to change any
/// field afterwards.
#[derive(Debug, Clone)]
pub struct Node {
    state: State,
    parent: Option<NodeId>,
    pour: Option<Pour>,
    h: f64,
    f: f64,
}

impl Node {
    /// The root of a search: no parent, no producing move.
    pub fn root(state: State, h: f64) -> Self {
        Self::new(state, None, None, h)
    }

    /// A node reached from `parent` by `pour`.
    pub fn child(state: State, parent: NodeId, pour: Pour, h: f64) -> Self {
        Self::new(state, Some(parent), Some(pour), h)
    }

    fn new(state: State, parent: Option<NodeId>, pour: Option<Pour>, h: f64) -> Self {
        let f = f64::from(state.steps()) + h;
        Self {
            state,
            parent,
            pour,
            h,
            f,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Move that produced this node (`None` for the root)
    pub fn pour(&self) -> Option<Pour> {
        self.pour
    }

    /// Steps taken so far
    pub fn g(&self) -> u32 {
        self.state.steps()
    }

    /// Heuristic estimate of the remaining steps
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Total estimated cost, `g + h`
    pub fn f(&self) -> f64 {
        self.f
    }
}

/// Append-only owner of every node created during a search.
///
/// Memory grows with the number of generated nodes for the lifetime of the
/// search; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes from the root down to `id`, following parent links.
    pub fn path_to(&self, id: NodeId) -> Vec<&Node> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current);
            path.push(node);
            cursor = node.parent();
        }
        path.reverse();
        path
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_f_is_sum_of_g_and_h() {
        let node = Node::root(State::new(smallvec![3, 0, 0], 4), 2.5);
        assert_eq!(node.g(), 4);
        assert_eq!(node.h(), 2.5);
        assert_eq!(node.f(), 6.5);
    }

    #[test]
    fn test_state_views() {
        let state = State::new(smallvec![3, 2, 7], 1);
        assert_eq!(state.pitchers(), &[3, 2]);
        assert_eq!(state.goal(), 7);
        assert_eq!(state.goal_index(), 2);
        assert_eq!(state.total(), 12);

        let next = state.successor(|fills| fills[0] = 0);
        assert_eq!(next.fills(), &[0, 2, 7]);
        assert_eq!(next.steps(), 2);
        assert_eq!(state.fills(), &[3, 2, 7], "original state is untouched");
    }

    #[test]
    fn test_total_saturates() {
        let state = State::new(smallvec![u64::MAX - 1, 3, u64::MAX], 2);
        assert_eq!(state.total(), u64::MAX);
    }

    #[test]
    fn test_path_to_walks_parents_from_root() {
        let mut arena = NodeArena::new();
        let root_state = State::new(smallvec![0, 0, 0], 0);
        let root = arena.push(Node::root(root_state.clone(), 0.0));

        let filled = root_state.successor(|fills| fills[1] = 5);
        let a = arena.push(Node::child(filled.clone(), root, Pour::Fill(1), 0.0));

        let poured = filled.successor(|fills| {
            fills[2] = 5;
            fills[1] = 0;
        });
        let b = arena.push(Node::child(poured, a, Pour::PourIntoGoal(1), 0.0));

        let path: Vec<&[u64]> = arena.path_to(b).into_iter().map(|n| n.state().fills()).collect();
        assert_eq!(path, vec![&[0, 0, 0][..], &[0, 5, 0][..], &[0, 0, 5][..]]);
        assert_eq!(arena[b].parent(), Some(a));
        assert_eq!(arena[root].pour(), None);
    }
}
