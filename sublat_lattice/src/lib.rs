//! Subgraph containment lattice over a pattern library.
//!
//! [`Lattice::build`] arranges patterns by containment, keeping only covering
//! edges, and groups them into layers by longest path from the most specific
//! patterns. [`Lattice::count_occurrences`] then finds every database graph
//! containing each pattern, testing a pattern only against the graphs that
//! contain all of its children.
//!
//! ```
//! use std::convert::Infallible;
//! use sublat_common::{Config, Contains};
//! use sublat_lattice::Lattice;
//!
//! /// Strings contain their proper substrings.
//! struct Word(&'static str);
//!
//! impl Contains for Word {
//!     type Error = Infallible;
//!     fn contains(&self, other: &Self) -> Result<bool, Infallible> {
//!         Ok(self.0 != other.0 && self.0.contains(other.0))
//!     }
//! }
//!
//! let patterns = vec![Word("a"), Word("ab"), Word("abc")];
//! let mut lattice = Lattice::build(patterns, &Config::default()).unwrap();
//! assert_eq!(lattice.edges().len(), 2);
//!
//! let database = vec![Word("xabx"), Word("abcd"), Word("zz")];
//! lattice.count_occurrences(&database, &Config::default()).unwrap();
//! assert_eq!(lattice.occurrence_counts(), vec![2, 2, 1]);
//! ```

mod builder;
mod dedup;
mod error;
mod export;
mod lattice;
mod layers;
mod node;
mod occurrences;

pub mod profiling;
pub mod verify;

pub use crate::builder::BuildStats;
pub use crate::dedup::{Deduped, dedup_mutual};
pub use crate::error::{LatticeError, VerifyError};
pub use crate::export::{ExportEdge, ExportNode, LatticeExport, SUBGRAPH_RELATION};
pub use crate::lattice::Lattice;
pub use crate::layers::Layers;
pub use crate::node::{NodeIdx, NodeState, PatternNode};
pub use crate::occurrences::{CountSummary, brute_force_occurrences};
