//! Error types for citation graph analysis.
//!
//! Errors are split the same way the analysis treats problems:
//!
//! - **[`Error`]**: structural or configuration failures that abort the whole
//!   run before (or instead of) analyzing a partial graph.
//! - **[`AnalysisWarning`]**: per-record or per-edge anomalies that are
//!   recovered locally (the offending edge is skipped) and reported next to
//!   the final result.
//!
//! An unreachable shortest-path target is neither: it is a normal result.

use crate::domain::RecordId;
use serde::Serialize;
use std::io;
use thiserror::Error;

/// Result type for citegraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for citegraph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Threshold, weights, floor, or a config file are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A record breaks the contiguous-id invariant (missing or duplicate id).
    #[error("malformed record at position {index}: {reason}")]
    MalformedRecord {
        /// Position of the record in the input sequence.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A zero, negative, or non-finite edge weight reached the shortest-path solver.
    #[error("invalid edge weight {weight} on {from} -> {to}: weights must be finite and positive")]
    InvalidWeight {
        /// Source of the offending edge.
        from: RecordId,
        /// Target of the offending edge.
        to: RecordId,
        /// The offending weight.
        weight: f64,
    },

    /// A query or edge refers to a record outside the record set.
    #[error("record {0} does not exist")]
    UnknownRecord(RecordId),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reading or writing a JSONL record file failed.
    #[error("record file error: {0}")]
    Jsonl(#[from] citegraph_jsonl::Error),
}

/// A non-fatal anomaly found while building the citation graph.
///
/// The edge that triggered the warning is skipped (or collapsed) and the
/// analysis continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// An explicit citation points outside the record set.
    DanglingCitation {
        /// The citing record.
        from: RecordId,
        /// The raw target id as given in the input.
        target: i64,
    },

    /// A record lists itself among its explicit citations.
    SelfCitation {
        /// The record citing itself.
        record: RecordId,
    },

    /// A record lists the same target more than once.
    DuplicateCitation {
        /// The citing record.
        from: RecordId,
        /// The repeated target.
        to: RecordId,
    },
}

impl AnalysisWarning {
    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DanglingCitation { .. } => "dangling_citation",
            Self::SelfCitation { .. } => "self_citation",
            Self::DuplicateCitation { .. } => "duplicate_citation",
        }
    }
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingCitation { from, target } => write!(
                f,
                "record {from} cites {target}, which is not in the record set; edge skipped"
            ),
            Self::SelfCitation { record } => {
                write!(f, "record {record} cites itself; edge skipped")
            }
            Self::DuplicateCitation { from, to } => {
                write!(f, "record {from} cites {to} more than once; kept one edge")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_names_the_records() {
        let warning = AnalysisWarning::DanglingCitation {
            from: RecordId(3),
            target: 99,
        };
        let text = warning.to_string();
        assert!(text.contains('3'));
        assert!(text.contains("99"));
        assert_eq!(warning.kind(), "dangling_citation");
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let warning = AnalysisWarning::SelfCitation {
            record: RecordId(1),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "self_citation");
        assert_eq!(json["record"], 1);
    }

    #[test]
    fn invalid_weight_message_includes_edge() {
        let err = Error::InvalidWeight {
            from: RecordId(0),
            to: RecordId(2),
            weight: -1.0,
        };
        let text = err.to_string();
        assert!(text.contains("0 -> 2"));
        assert!(text.contains("-1"));
    }
}
