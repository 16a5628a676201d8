//! A concrete node-labeled directed graph for sublat.
//!
//! [`LabeledGraph`] implements the [`sublat_common::Contains`] capability
//! through a backtracking monomorphism search, so it can serve as both
//! pattern and database graph. The lattice crates never depend on it; it
//! exists for the binary, fixtures and tests.

mod error;
mod graph;
mod index;
mod matcher;

pub mod fixtures;
pub mod io;

pub use crate::error::GraphError;
pub use crate::graph::LabeledGraph;
pub use crate::io::{load_graphs, parse_graphs, save_graphs};
