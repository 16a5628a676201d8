//! Errors raised while aggregating and writing occurrence statistics.

use std::path::PathBuf;

use sublat_lattice::LatticeError;
use thiserror::Error;

/// Boxed failure of the lattice or counting layer.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while computing or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    // === Computation ===
    /// Building the lattice or counting occurrences failed.
    #[error("occurrence counting failed: {0}")]
    Counting(#[source] BoxedError),

    /// Records were requested before any occurrences were computed.
    #[error("occurrences have not been computed yet")]
    MissingCounts,

    // === Output ===
    /// Writing a CSV record failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Creating the output file or its directory failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E> From<LatticeError<E>> for ReportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: LatticeError<E>) -> Self {
        Self::Counting(Box::new(err))
    }
}
