//! Loading record files from disk.
//!
//! Records arrive as JSONL, one [`RawRecord`] per line. When records carry
//! their own `id`, a malformed line is skipped with a [`LoadWarning`]; if it
//! held a real record, the resulting id gap is caught by [`RecordSet`].
//! When ids are positional, a skipped line would shift every later record
//! (and every citation pointing at one), so it is fatal instead.

use crate::domain::{RawRecord, RecordSet};
use crate::error::{Error, Result};
use crate::graph::Edge;
use std::fmt;
use std::path::Path;

/// A line of the record file that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// 1-based line number in the record file.
    pub line_number: usize,
    /// Why the line was skipped.
    pub reason: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.reason)
    }
}

impl From<citegraph_jsonl::Warning> for LoadWarning {
    fn from(warning: citegraph_jsonl::Warning) -> Self {
        match warning {
            citegraph_jsonl::Warning::MalformedJson { line_number, error } => Self {
                line_number,
                reason: format!("malformed JSON: {error}"),
            },
            citegraph_jsonl::Warning::SkippedLine {
                line_number,
                reason,
            } => Self {
                line_number,
                reason,
            },
        }
    }
}

/// Reads and normalizes a JSONL record file.
///
/// # Errors
///
/// Returns [`crate::Error::Jsonl`] if the file cannot be read, or
/// [`crate::Error::MalformedRecord`] if the parsed records violate the id
/// rules or a line is unreadable while ids are positional.
pub async fn load_records(path: &Path) -> Result<(RecordSet, Vec<LoadWarning>)> {
    let (raw, warnings) = citegraph_jsonl::read_jsonl_resilient::<RawRecord, _>(path).await?;
    let warnings: Vec<LoadWarning> = warnings.into_iter().map(LoadWarning::from).collect();

    let positional = !raw.iter().any(|r| r.id.is_some());
    if positional && let Some(first) = warnings.first() {
        return Err(Error::MalformedRecord {
            index: first.line_number.saturating_sub(1),
            reason: format!(
                "{first}; records have no ids, so the records after it cannot be numbered"
            ),
        });
    }

    for warning in &warnings {
        tracing::warn!(
            path = %path.display(),
            line = warning.line_number,
            reason = %warning.reason,
            "Skipped malformed record line"
        );
    }

    let records = RecordSet::from_raw(raw)?;
    tracing::info!(
        path = %path.display(),
        records = records.len(),
        skipped = warnings.len(),
        "Loaded records"
    );
    Ok((records, warnings))
}

/// Writes an edge list as JSONL, replacing `path` atomically.
///
/// # Errors
///
/// Returns [`crate::Error::Jsonl`] if the file cannot be written.
pub async fn export_edges<'a, I>(path: &Path, edges: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Edge>,
{
    let written = citegraph_jsonl::write_jsonl_atomic(path, edges).await?;
    tracing::info!(path = %path.display(), edges = written, "Exported edges");
    Ok(written)
}
