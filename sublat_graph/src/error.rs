//! Error types for graph construction, loading and matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by [`crate::LabeledGraph`] and the loaders.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge refers to a node index that does not exist.
    #[error("edge {edge} references node {endpoint}, but the graph has only {node_count} nodes")]
    DanglingEdge {
        /// Position of the edge in the edge list.
        edge: usize,
        /// Offending endpoint.
        endpoint: u32,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// Reading a graph file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A graph file is not valid JSON for a graph collection.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A loaded graph failed validation.
    #[error("graph {index} in {path} is malformed: {source}")]
    Invalid {
        /// File the graph came from.
        path: PathBuf,
        /// Position of the graph in the file.
        index: usize,
        /// Validation failure.
        #[source]
        source: Box<GraphError>,
    },
}

impl GraphError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error for `path`.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
