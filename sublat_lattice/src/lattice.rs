//! The lattice container: owns every node, wires edges by index.

use std::collections::BTreeSet;

use contracts::*;
use sublat_common::{Config, Contains};
use tracing::{debug, info};

use crate::builder::{BuildStats, Construction};
use crate::layers::{Layers, compute_layers};
use crate::node::{NodeIdx, PatternNode};
use crate::{LatticeError, verify};

/// Containment lattice over a pattern library.
///
/// Edges run from a pattern to the patterns it immediately contains (the
/// transitive reduction of containment). Nodes are addressed by [`NodeIdx`],
/// which equals the position of the pattern in the input.
#[derive(Clone, Debug)]
pub struct Lattice<G> {
    pub(crate) nodes: Vec<PatternNode<G>>,
    pub(crate) layers: Layers,
    pub(crate) stats: BuildStats,
}

impl<G: Contains> Lattice<G> {
    /// Builds the lattice for `patterns`.
    ///
    /// Every pattern is validated first. Distinct patterns must not contain
    /// each other; with `config.strict_order` set this is checked on every
    /// covering edge and reported as [`LatticeError::InvalidOrder`].
    ///
    /// Nodes are indexed by `u32`, so at most `u32::MAX` patterns fit in one
    /// lattice.
    pub fn build(patterns: Vec<G>, config: &Config) -> Result<Self, LatticeError<G::Error>> {
        info!("Building lattice over {} patterns", patterns.len());

        for (index, pattern) in patterns.iter().enumerate() {
            pattern
                .validate()
                .map_err(|source| LatticeError::MalformedPattern { index, source })?;
        }

        let mut nodes: Vec<PatternNode<G>> = patterns.into_iter().map(PatternNode::new).collect();

        let mut construction = Construction::new(&mut nodes);
        construction.run()?;
        if config.strict_order {
            construction.check_strict_order()?;
        }
        let stats = construction.finish();

        verify::check_acyclic(&nodes)?;
        let layers = compute_layers(&mut nodes);

        info!(
            "Lattice built: {} nodes, {} edges, {} layers, {} containment checks",
            nodes.len(),
            stats.edges,
            layers.len(),
            stats.evaluations
        );
        debug!("Build statistics: {:?}", stats);

        Ok(Self {
            nodes,
            layers,
            stats,
        })
    }
}

impl<G> Lattice<G> {
    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a lattice over no patterns.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[PatternNode<G>] {
        &self.nodes
    }

    /// Node at `idx`, if present.
    pub fn node(&self, idx: NodeIdx) -> Option<&PatternNode<G>> {
        self.nodes.get(idx.as_usize())
    }

    /// Pattern at `idx`, if present.
    pub fn pattern(&self, idx: NodeIdx) -> Option<&G> {
        self.node(idx).map(PatternNode::pattern)
    }

    /// Indices of all nodes in input order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.nodes.len()).map(NodeIdx::from)
    }

    /// Layer number to nodes on that layer.
    pub const fn layers(&self) -> &Layers {
        &self.layers
    }

    /// Statistics recorded while building.
    pub const fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// All `(parent, child)` edges, ordered by parent then child position.
    pub fn edges(&self) -> Vec<(NodeIdx, NodeIdx)> {
        let mut edges: Vec<(NodeIdx, NodeIdx)> = self
            .indices()
            .flat_map(|parent| {
                self.nodes[parent.as_usize()]
                    .children
                    .iter()
                    .map(move |&child| (parent, child))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Nodes without parents (the most general patterns).
    pub fn roots(&self) -> Vec<NodeIdx> {
        self.indices()
            .filter(|&idx| self.nodes[idx.as_usize()].parents.is_empty())
            .collect()
    }

    /// Nodes without children (the most specific patterns, layer 0).
    pub fn leaves(&self) -> Vec<NodeIdx> {
        self.indices()
            .filter(|&idx| self.nodes[idx.as_usize()].children.is_empty())
            .collect()
    }

    /// Returns true if `ancestor` properly contains `descendant` according to
    /// the lattice.
    pub fn is_ancestor(&self, ancestor: NodeIdx, descendant: NodeIdx) -> bool {
        self.node(descendant)
            .is_some_and(|node| node.reachable.contains_key(&ancestor))
    }

    /// Occurrence set of every node, in input order. Empty until counted.
    pub fn occurrence_sets(&self) -> Vec<&BTreeSet<usize>> {
        self.nodes.iter().map(PatternNode::occurrences).collect()
    }

    /// Number of database graphs containing each pattern, in input order.
    pub fn occurrence_counts(&self) -> Vec<usize> {
        self.nodes.iter().map(|node| node.occurrences.len()).collect()
    }

    /// Drops the structure and returns the patterns in input order.
    pub fn into_patterns(self) -> Vec<G> {
        self.nodes.into_iter().map(PatternNode::into_pattern).collect()
    }
}

/// Adds the edge `parent -> child` to both adjacency lists.
#[debug_ensures(nodes[parent.as_usize()].children.contains(&child))]
#[debug_ensures(nodes[child.as_usize()].parents.contains(&parent))]
pub(crate) fn link<G>(nodes: &mut [PatternNode<G>], parent: NodeIdx, child: NodeIdx) {
    nodes[parent.as_usize()].children.push(child);
    nodes[child.as_usize()].parents.push(parent);
}

/// Removes the edge `parent -> child` from both adjacency lists.
#[debug_ensures(!nodes[parent.as_usize()].children.contains(&child))]
#[debug_ensures(!nodes[child.as_usize()].parents.contains(&parent))]
pub(crate) fn unlink<G>(nodes: &mut [PatternNode<G>], parent: NodeIdx, child: NodeIdx) {
    nodes[parent.as_usize()].children.retain(|&c| c != child);
    nodes[child.as_usize()].parents.retain(|&p| p != parent);
}
