//! Depth-first lattice construction with an explicit work stack.
//!
//! Starting from every undiscovered node, the builder walks upwards through
//! containers. At each node only candidates not yet proven to fail
//! containment are tested. Whenever a container is found, the negative
//! knowledge of the contained node is handed up to it, since anything that
//! does not contain a child cannot contain its container either.
//!
//! Edges are wired provisionally as containment is found. Once a node has
//! seen all its candidates, its longest-path distances to every ancestor are
//! final, and any parent reachable by a path longer than one is a shortcut
//! whose direct edge is dropped. Nodes are finalized one at a time in this
//! order; running the shortcut pass globally at the end would use distances
//! that are still growing elsewhere.

use serde::{Deserialize, Serialize};
use sublat_common::Contains;
use tracing::{debug, trace};

use crate::lattice::{link, unlink};
use crate::node::{NodeIdx, NodeState, PatternNode};
use crate::profiling::Timer;
use crate::LatticeError;

/// Counters collected while building a lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Containment predicate evaluations between patterns.
    pub evaluations: usize,
    /// Candidate checks avoided through `no_parent_candidates`.
    pub memo_skips: usize,
    /// Candidate checks avoided because the candidate was already reachable.
    pub reach_skips: usize,
    /// Provisional edges removed as shortcuts.
    pub shortcuts_removed: usize,
    /// Edges left in the finished lattice.
    pub edges: usize,
}

/// One pending exploration step: `child` and how far through its candidate
/// list the builder has got.
#[derive(Debug)]
struct Frame {
    child: NodeIdx,
    candidates: Vec<NodeIdx>,
    cursor: usize,
    /// Container that was descended into and still has to propagate its
    /// distances down the current path once it is finished.
    awaiting: Option<NodeIdx>,
}

/// Mutable construction state over the node arena.
pub(crate) struct Construction<'n, G> {
    nodes: &'n mut [PatternNode<G>],
    stats: BuildStats,
}

impl<'n, G: Contains> Construction<'n, G> {
    pub(crate) fn new(nodes: &'n mut [PatternNode<G>]) -> Self {
        Self {
            nodes,
            stats: BuildStats::default(),
        }
    }

    /// Explores every node and wires the transitive reduction.
    pub(crate) fn run(&mut self) -> Result<(), LatticeError<G::Error>> {
        // A node cannot be its own parent.
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.no_parent_candidates.insert(NodeIdx::from(i));
        }

        for root in 0..self.nodes.len() {
            self.explore(NodeIdx::from(root))?;
        }

        self.stats.edges = self.nodes.iter().map(|n| n.children.len()).sum();
        debug!(
            "Construction finished: {} evaluations, {} memo skips, {} reach skips, {} shortcuts removed",
            self.stats.evaluations,
            self.stats.memo_skips,
            self.stats.reach_skips,
            self.stats.shortcuts_removed
        );
        Ok(())
    }

    /// Rejects covering edges whose child also contains the parent.
    ///
    /// If two distinct patterns contain each other, some covering edge
    /// between mutually containing patterns exists, so checking every edge
    /// in reverse is enough.
    pub(crate) fn check_strict_order(&mut self) -> Result<(), LatticeError<G::Error>> {
        let edges: Vec<(NodeIdx, NodeIdx)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(i, n)| n.children.iter().map(move |&c| (NodeIdx::from(i), c)))
            .collect();

        debug!("Checking {} covering edges for mutual containment", edges.len());
        for (parent, child) in edges {
            if self.test(child, parent)? {
                return Err(LatticeError::InvalidOrder {
                    first: parent,
                    second: child,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> BuildStats {
        self.stats
    }

    /// Iterative depth-first exploration rooted at `root`.
    ///
    /// `path` mirrors the `child` of every frame on the stack, root first.
    fn explore(&mut self, root: NodeIdx) -> Result<(), LatticeError<G::Error>> {
        if self.node(root).is_discovered() {
            return Ok(());
        }

        let mut stack: Vec<Frame> = vec![self.frame_for(root)];
        let mut path: Vec<NodeIdx> = vec![root];

        while let Some(top) = stack.last_mut() {
            if let Some(finished) = top.awaiting.take() {
                self.propagate(&path, finished);
            }

            let child = top.child;
            let mut descend: Option<NodeIdx> = None;

            while let Some(&candidate) = top.candidates.get(top.cursor) {
                top.cursor += 1;

                match self.node(candidate).state() {
                    NodeState::Pending => {
                        if self.test(candidate, child)? {
                            self.absorb_no_parent(candidate, child);
                            self.wire(candidate, child);
                            top.awaiting = Some(candidate);
                            descend = Some(candidate);
                            break;
                        }
                        self.node_mut(child).no_parent_candidates.insert(candidate);
                    }
                    NodeState::Discovered => {
                        // Already reachable means either already a parent or
                        // reachable through a longer path; either way no new
                        // covering edge can arise.
                        if self.node(child).reachable.contains_key(&candidate) {
                            self.stats.reach_skips += 1;
                            continue;
                        }
                        if self.test(candidate, child)? {
                            self.propagate(&path, candidate);
                            self.wire(candidate, child);
                        } else {
                            self.node_mut(child).no_parent_candidates.insert(candidate);
                        }
                    }
                }
            }

            if let Some(container) = descend {
                let frame = self.frame_for(container);
                stack.push(frame);
                path.push(container);
                continue;
            }

            self.eliminate_shortcuts(child);
            self.node_mut(child).mark_discovered();
            trace!("Discovered {}", child);

            stack.pop();
            path.pop();
        }

        Ok(())
    }

    /// Opens an exploration step, listing every node not yet known to fail.
    fn frame_for(&mut self, child: NodeIdx) -> Frame {
        let node = self.node(child);
        let candidates: Vec<NodeIdx> = (0..self.nodes.len())
            .map(NodeIdx::from)
            .filter(|idx| !node.no_parent_candidates.contains(idx))
            .collect();
        self.stats.memo_skips += self.nodes.len() - candidates.len();

        Frame {
            child,
            candidates,
            cursor: 0,
            awaiting: None,
        }
    }

    /// Evaluates `container.contains(contained)`.
    fn test(&mut self, container: NodeIdx, contained: NodeIdx) -> Result<bool, LatticeError<G::Error>> {
        let _t = Timer::new("build::contains");
        self.stats.evaluations += 1;

        let result = self
            .node(container)
            .pattern()
            .contains(self.node(contained).pattern())
            .map_err(|source| LatticeError::predicate(container, contained, source))?;
        trace!("{} contains {}: {}", container, contained, result);
        Ok(result)
    }

    /// Hands the failed-container knowledge of `child` up to `container`.
    fn absorb_no_parent(&mut self, container: NodeIdx, child: NodeIdx) {
        let inherited: Vec<NodeIdx> = self
            .node(child)
            .no_parent_candidates
            .iter()
            .copied()
            .collect();
        let target = &mut self.node_mut(container).no_parent_candidates;
        target.extend(inherited);
        target.insert(container);
    }

    fn wire(&mut self, parent: NodeIdx, child: NodeIdx) {
        trace!("Wiring {} -> {}", parent, child);
        link(self.nodes, parent, child);
    }

    /// Records the distances through `container` on every node of `path`.
    ///
    /// The last node of `path` is the direct child of `container`; a node at
    /// position `depth` is `path.len() - depth` steps below it.
    fn propagate(&mut self, path: &[NodeIdx], container: NodeIdx) {
        let upper: Vec<(NodeIdx, usize)> = self
            .node(container)
            .reachable
            .iter()
            .map(|(&ancestor, &distance)| (ancestor, distance))
            .collect();

        let len = path.len();
        for (depth, &below) in path.iter().enumerate() {
            let to_container = len - depth;
            let node = self.node_mut(below);
            node.extend_reach(container, to_container);
            for &(ancestor, distance) in &upper {
                node.extend_reach(ancestor, to_container + distance);
            }
        }
    }

    /// Drops every parent edge of `child` implied by a longer path.
    fn eliminate_shortcuts(&mut self, child: NodeIdx) {
        let node = self.node(child);
        let shortcuts: Vec<NodeIdx> = node
            .parents
            .iter()
            .copied()
            .filter(|parent| node.distance_to(*parent).is_some_and(|d| d > 1))
            .collect();

        for parent in shortcuts {
            trace!("Removing shortcut {} -> {}", parent, child);
            unlink(self.nodes, parent, child);
            self.stats.shortcuts_removed += 1;
        }
    }

    fn node(&self, idx: NodeIdx) -> &PatternNode<G> {
        &self.nodes[idx.as_usize()]
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut PatternNode<G> {
        &mut self.nodes[idx.as_usize()]
    }
}
