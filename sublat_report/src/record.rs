//! Per-pattern result rows.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Everything reported about one pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    /// Pattern name.
    pub name: String,
    /// Free-form tag copied onto every row, e.g. to tell runs apart later.
    pub tag: String,
    /// Total embeddings over all containing graphs; 0 unless computed.
    pub embedding_occurrence_count: usize,
    /// Number of database graphs containing the pattern.
    pub transaction_occurrence_count: usize,
    /// `(occurrences - 1) * (nodes + edges)`.
    pub compression: i64,
    /// Names of the database graphs containing the pattern.
    pub occurrence_references: Vec<String>,
}

impl OccurrenceRecord {
    /// Compression heuristic for a pattern of `size` nodes plus edges
    /// occurring in `occurrences` graphs.
    ///
    /// ```
    /// use sublat_report::OccurrenceRecord;
    ///
    /// assert_eq!(OccurrenceRecord::compression(3, 5), 10);
    /// assert_eq!(OccurrenceRecord::compression(0, 5), -5);
    /// ```
    pub fn compression(occurrences: usize, size: usize) -> i64 {
        (occurrences as i64 - 1) * size as i64
    }

    /// References rendered as `[a;b;c]`.
    pub fn references_field(&self) -> String {
        format!("[{}]", self.occurrence_references.iter().join(";"))
    }

    /// The six CSV fields of this record, in column order.
    pub fn fields(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.tag.clone(),
            self.embedding_occurrence_count.to_string(),
            self.transaction_occurrence_count.to_string(),
            self.compression.to_string(),
            self.references_field(),
        ]
    }
}
