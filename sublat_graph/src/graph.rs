//! Node-labeled directed graph.

use std::collections::HashSet;
use std::sync::OnceLock;

use contracts::*;
use serde::{Deserialize, Serialize};
use sublat_common::{Contains, CountEmbeddings, GraphMeta};

use crate::GraphError;
use crate::index::GraphIndex;
use crate::matcher::Matcher;

/// A directed graph whose nodes carry string labels.
///
/// Edges are `(source, target)` index pairs. Self loops are allowed, parallel
/// edges collapse into one. The adjacency index used by the matcher is built
/// lazily on first use and shared between threads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LabeledGraph {
    /// Optional name used in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Label per node; the node index is the position.
    labels: Vec<String>,
    /// Directed edges.
    #[serde(default)]
    edges: Vec<(u32, u32)>,
    /// Lazily built adjacency index.
    #[serde(skip)]
    index: OnceLock<GraphIndex>,
}

impl LabeledGraph {
    /// Creates an empty, unnamed graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builds a graph from labels and edges, rejecting dangling edges.
    pub fn from_parts<L, S>(
        name: Option<String>,
        labels: L,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, GraphError>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self {
            name,
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        };
        for (source, target) in edges {
            graph.add_edge(source, target)?;
        }
        Ok(graph)
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Adds a node and returns its index.
    #[debug_ensures(self.labels.len() == old(self.labels.len()) + 1)]
    pub fn add_node(&mut self, label: impl Into<String>) -> u32 {
        self.index = OnceLock::new();
        self.labels.push(label.into());
        (self.labels.len() - 1) as u32
    }

    /// Adds a directed edge. Adding an existing edge is a no-op.
    pub fn add_edge(&mut self, source: u32, target: u32) -> Result<(), GraphError> {
        for endpoint in [source, target] {
            if endpoint as usize >= self.labels.len() {
                return Err(GraphError::DanglingEdge {
                    edge: self.edges.len(),
                    endpoint,
                    node_count: self.labels.len(),
                });
            }
        }
        if !self.edges.contains(&(source, target)) {
            self.index = OnceLock::new();
            self.edges.push((source, target));
        }
        Ok(())
    }

    /// Node labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Directed edges in insertion order.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Checks every edge endpoint against the node count.
    pub fn check_edges(&self) -> Result<(), GraphError> {
        let node_count = self.labels.len();
        for (edge, &(source, target)) in self.edges.iter().enumerate() {
            for endpoint in [source, target] {
                if endpoint as usize >= node_count {
                    return Err(GraphError::DanglingEdge {
                        edge,
                        endpoint,
                        node_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the adjacency index, building it on first use.
    pub(crate) fn index(&self) -> Result<&GraphIndex, GraphError> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        self.check_edges()?;
        Ok(self.index.get_or_init(|| GraphIndex::build(self)))
    }

    /// Number of embeddings of `pattern` into `self`, stopping at `limit`.
    pub fn embeddings(&self, pattern: &Self, limit: Option<usize>) -> Result<usize, GraphError> {
        let host = self.index()?;
        let needle = pattern.index()?;
        Ok(Matcher::new(needle, host).count(limit))
    }
}

impl Contains for LabeledGraph {
    type Error = GraphError;

    fn contains(&self, other: &Self) -> Result<bool, Self::Error> {
        Ok(self.embeddings(other, Some(1))? > 0)
    }

    fn validate(&self) -> Result<(), Self::Error> {
        self.check_edges()
    }
}

impl CountEmbeddings for LabeledGraph {
    fn count_embeddings(&self, pattern: &Self) -> Result<usize, Self::Error> {
        self.embeddings(pattern, None)
    }
}

impl GraphMeta for LabeledGraph {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.iter().collect::<HashSet<_>>().len()
    }
}
