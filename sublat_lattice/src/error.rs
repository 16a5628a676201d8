//! Error types for lattice construction and occurrence counting.
//!
//! Construction and counting either succeed as a whole or fail; no partially
//! wired lattice or partially filled occurrence set is ever handed back.

use thiserror::Error;

use crate::NodeIdx;

/// Errors raised while building a lattice or counting occurrences.
///
/// `E` is the error type of the containment predicate in use.
#[derive(Debug, Error)]
pub enum LatticeError<E>
where
    E: std::error::Error + 'static,
{
    // === Input validation (before any containment check) ===
    /// A pattern failed validation.
    #[error("pattern {index} is malformed: {source}")]
    MalformedPattern {
        /// Position of the pattern in the input.
        index: usize,
        /// Validation failure.
        #[source]
        source: E,
    },

    /// A database graph failed validation.
    #[error("database graph {index} is malformed: {source}")]
    MalformedGraph {
        /// Position of the graph in the database.
        index: usize,
        /// Validation failure.
        #[source]
        source: E,
    },

    // === Predicate failures ===
    /// The predicate failed while comparing two patterns.
    #[error("containment check of {contained} in {container} failed: {source}")]
    Predicate {
        /// Pattern tested as the larger one.
        container: NodeIdx,
        /// Pattern tested as the smaller one.
        contained: NodeIdx,
        /// Predicate failure.
        #[source]
        source: E,
    },

    /// The predicate failed while testing a pattern against a database graph.
    #[error("containment check of pattern {pattern} in database graph {graph} failed: {source}")]
    DatabasePredicate {
        /// Database graph index.
        graph: usize,
        /// Pattern being counted.
        pattern: NodeIdx,
        /// Predicate failure.
        #[source]
        source: E,
    },

    // === Precondition violations ===
    /// Two distinct patterns contain each other.
    #[error(
        "patterns {first} and {second} contain each other; deduplicate isomorphic patterns before building"
    )]
    InvalidOrder {
        /// First pattern of the pair.
        first: NodeIdx,
        /// Second pattern of the pair.
        second: NodeIdx,
    },

    /// The finished lattice violates a structural invariant.
    #[error(transparent)]
    Structure(#[from] VerifyError),
}

impl<E> LatticeError<E>
where
    E: std::error::Error + 'static,
{
    /// Create a predicate error for a pattern pair.
    pub fn predicate(container: NodeIdx, contained: NodeIdx, source: E) -> Self {
        Self::Predicate {
            container,
            contained,
            source,
        }
    }

    /// Create a predicate error for a database check.
    pub fn database(graph: usize, pattern: NodeIdx, source: E) -> Self {
        Self::DatabasePredicate {
            graph,
            pattern,
            source,
        }
    }
}

/// Structural invariant violations found by [`crate::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A node is its own ancestor.
    #[error("cycle detected involving node {node}")]
    Cycle {
        /// A node on the cycle.
        node: NodeIdx,
    },

    /// An edge is implied by a longer path.
    #[error("edge {parent} -> {child} is a shortcut of a longer path")]
    Shortcut {
        /// Parent end of the edge.
        parent: NodeIdx,
        /// Child end of the edge.
        child: NodeIdx,
    },

    /// Parent and child lists disagree about an edge.
    #[error("edge {parent} -> {child} is recorded on only one side")]
    OneSided {
        /// Parent end of the edge.
        parent: NodeIdx,
        /// Child end of the edge.
        child: NodeIdx,
    },

    /// A parent does not sit on a strictly higher layer than its child.
    #[error("layer of {parent} ({parent_layer}) is not above layer of {child} ({child_layer})")]
    LayerOrder {
        /// Parent end of the edge.
        parent: NodeIdx,
        /// Layer of the parent.
        parent_layer: usize,
        /// Child end of the edge.
        child: NodeIdx,
        /// Layer of the child.
        child_layer: usize,
    },

    /// A parent occurs in a graph one of its children does not occur in.
    #[error("{parent} occurs in graph {graph} but its child {child} does not")]
    OccurrenceOrder {
        /// Parent pattern.
        parent: NodeIdx,
        /// Child pattern.
        child: NodeIdx,
        /// Database graph index.
        graph: usize,
    },

    /// An edge whose parent does not contain its child.
    #[error("edge {parent} -> {child} is not backed by containment")]
    Unsound {
        /// Parent end of the edge.
        parent: NodeIdx,
        /// Child end of the edge.
        child: NodeIdx,
    },

    /// A containing pair with no path between them.
    #[error("{container} contains {contained} but no path connects them")]
    Unreachable {
        /// Containing pattern.
        container: NodeIdx,
        /// Contained pattern.
        contained: NodeIdx,
    },

    /// A node index outside the lattice.
    #[error("unknown node {0}")]
    UnknownNode(NodeIdx),
}
