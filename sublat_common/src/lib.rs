//! Common capability traits and shared configuration for the sublat workspace.
//!
//! The lattice and counting crates never look inside a graph. Everything they
//! need from a pattern or a database graph is expressed by the traits in
//! [`capability`], and every knob they expose lives in [`Config`].

mod capability;
mod config;

pub use crate::capability::*;
pub use crate::config::*;
