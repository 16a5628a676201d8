//! JSON loading and saving of graph collections.
//!
//! A collection file holds a JSON array of graphs:
//!
//! ```json
//! [
//!   { "name": "edge", "labels": ["x", "x"], "edges": [[0, 1]] },
//!   { "labels": ["x"] }
//! ]
//! ```

use std::fs;
use std::path::Path;

use sublat_common::Contains;
use tracing::{debug, info};

use crate::{GraphError, LabeledGraph};

/// Loads and validates every graph in a collection file.
pub fn load_graphs(path: impl AsRef<Path>) -> Result<Vec<LabeledGraph>, GraphError> {
    let path = path.as_ref();
    info!("Loading graph collection: {}", path.display());

    let text = fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
    let graphs = parse_graphs(&text).map_err(|e| GraphError::json(path, e))?;

    for (index, graph) in graphs.iter().enumerate() {
        graph.validate().map_err(|e| GraphError::Invalid {
            path: path.to_path_buf(),
            index,
            source: Box::new(e),
        })?;
    }

    debug!("Loaded {} graphs from {}", graphs.len(), path.display());
    Ok(graphs)
}

/// Parses a collection from JSON text without validating it.
pub fn parse_graphs(text: &str) -> Result<Vec<LabeledGraph>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Writes a collection as pretty printed JSON.
pub fn save_graphs(path: impl AsRef<Path>, graphs: &[LabeledGraph]) -> Result<(), GraphError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(graphs).map_err(|e| GraphError::json(path, e))?;
    fs::write(path, text).map_err(|e| GraphError::io(path, e))
}
