//! Pattern nodes stored in the lattice arena.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use contracts::*;
use serde::{Deserialize, Serialize};

/// Stable index of a node in its lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIdx {
    /// The underlying raw integer index.
    inner: u32,
}

impl NodeIdx {
    /// Creates an index from a raw integer.
    #[debug_ensures(ret.inner == id)]
    pub fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for arena access.
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.inner)
    }
}

impl From<usize> for NodeIdx {
    #[inline]
    #[debug_requires(u32::try_from(id).is_ok(), "node index exceeds u32")]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<NodeIdx> for usize {
    #[inline]
    fn from(id: NodeIdx) -> Self {
        id.inner as Self
    }
}

/// Exploration state of a node during construction.
///
/// A node moves from `Pending` to `Discovered` exactly once, at the end of its
/// own exploration step. Its parent and child lists are final from then on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Neighbourhood not yet resolved.
    #[default]
    Pending,
    /// Neighbourhood final.
    Discovered,
}

/// One pattern plus its position in the lattice.
#[derive(Clone, Debug)]
pub struct PatternNode<G> {
    pattern: G,
    pub(crate) parents: Vec<NodeIdx>,
    pub(crate) children: Vec<NodeIdx>,
    /// Ancestor -> length of the longest path up to it.
    pub(crate) reachable: HashMap<NodeIdx, usize>,
    /// Nodes known not to contain this one.
    pub(crate) no_parent_candidates: HashSet<NodeIdx>,
    pub(crate) state: NodeState,
    pub(crate) layer: usize,
    /// Database graph indices this pattern occurs in.
    pub(crate) occurrences: BTreeSet<usize>,
}

impl<G> PatternNode<G> {
    /// Wraps a pattern in an unconnected, pending node.
    pub fn new(pattern: G) -> Self {
        Self {
            pattern,
            parents: Vec::new(),
            children: Vec::new(),
            reachable: HashMap::new(),
            no_parent_candidates: HashSet::new(),
            state: NodeState::Pending,
            layer: 0,
            occurrences: BTreeSet::new(),
        }
    }

    /// The wrapped pattern.
    pub const fn pattern(&self) -> &G {
        &self.pattern
    }

    /// Consumes the node, returning the pattern.
    pub fn into_pattern(self) -> G {
        self.pattern
    }

    /// Immediate containers of this pattern.
    pub fn parents(&self) -> &[NodeIdx] {
        &self.parents
    }

    /// Immediately contained patterns.
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    /// Longest path length to every ancestor.
    pub const fn reachable(&self) -> &HashMap<NodeIdx, usize> {
        &self.reachable
    }

    /// Longest path length to `ancestor`, if it is one.
    pub fn distance_to(&self, ancestor: NodeIdx) -> Option<usize> {
        self.reachable.get(&ancestor).copied()
    }

    /// Nodes proven not to contain this one.
    pub const fn no_parent_candidates(&self) -> &HashSet<NodeIdx> {
        &self.no_parent_candidates
    }

    /// Exploration state.
    pub const fn state(&self) -> NodeState {
        self.state
    }

    /// True once the neighbourhood is final.
    pub fn is_discovered(&self) -> bool {
        self.state == NodeState::Discovered
    }

    /// Layer number; 0 for nodes without children.
    pub const fn layer(&self) -> usize {
        self.layer
    }

    /// Database graphs containing this pattern. Empty until counted.
    pub const fn occurrences(&self) -> &BTreeSet<usize> {
        &self.occurrences
    }

    /// Records `distance` to `ancestor`, keeping the longer of old and new.
    pub(crate) fn extend_reach(&mut self, ancestor: NodeIdx, distance: usize) {
        let entry = self.reachable.entry(ancestor).or_insert(0);
        *entry = (*entry).max(distance);
    }

    /// Marks the node as fully explored.
    #[debug_requires(self.state == NodeState::Pending)]
    #[debug_ensures(self.state == NodeState::Discovered)]
    pub(crate) fn mark_discovered(&mut self) {
        self.state = NodeState::Discovered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "node index exceeds u32")]
    fn oversized_index_is_rejected() {
        let _ = NodeIdx::from(u32::MAX as usize + 1);
    }

    #[test]
    fn new_node_is_pending_and_empty() {
        let node = PatternNode::new("p");
        assert_eq!(node.state(), NodeState::Pending);
        assert!(node.parents().is_empty());
        assert!(node.children().is_empty());
        assert!(node.reachable().is_empty());
        assert!(node.occurrences().is_empty());
        assert_eq!(node.layer(), 0);
        assert_eq!(*node.pattern(), "p");
    }

    #[test]
    fn reach_keeps_the_longest_path() {
        let mut node = PatternNode::new(());
        let up = NodeIdx::new(3);
        node.extend_reach(up, 2);
        node.extend_reach(up, 1);
        assert_eq!(node.distance_to(up), Some(2));
        node.extend_reach(up, 4);
        assert_eq!(node.distance_to(up), Some(4));
        assert_eq!(node.distance_to(NodeIdx::new(0)), None);
    }

    #[test]
    fn discovery_is_one_way() {
        let mut node = PatternNode::new(());
        node.mark_discovered();
        assert!(node.is_discovered());
    }

    #[test]
    fn index_conversions() {
        let idx = NodeIdx::from(7usize);
        assert_eq!(idx.as_usize(), 7);
        assert_eq!(usize::from(idx), 7);
        assert_eq!(idx.to_string(), "p7");
    }
}
