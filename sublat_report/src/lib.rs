//! Per-pattern occurrence reports.
//!
//! [`Statistics`] names patterns and database graphs, runs the counting
//! strategy selected by the configuration and turns the result into
//! [`OccurrenceRecord`]s, which [`write_csv`] serializes.

mod csv_out;
mod error;
mod record;
mod statistics;

pub use crate::csv_out::{to_csv_string, write_csv};
pub use crate::error::{BoxedError, ReportError};
pub use crate::record::OccurrenceRecord;
pub use crate::statistics::Statistics;
