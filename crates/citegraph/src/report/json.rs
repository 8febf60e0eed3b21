//! JSON views of analysis results, with record titles attached.

use crate::analysis::{AnalysisReport, NeighborEntry, Neighborhood};
use crate::domain::{Record, RecordId, RecordSet};
use crate::error::AnalysisWarning;
use crate::paths::PathResult;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct TitledRecord<'a> {
    id: RecordId,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
}

impl<'a> TitledRecord<'a> {
    fn lookup(records: &'a RecordSet, id: RecordId) -> Self {
        let record = records.get(id);
        Self {
            id,
            title: record.map_or("", |r| r.display_title.as_str()),
            year: record.and_then(|r| r.year),
        }
    }
}

impl<'a> From<&'a Record> for TitledRecord<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            id: record.id,
            title: &record.display_title,
            year: record.year,
        }
    }
}

#[derive(Serialize)]
struct PathView<'a> {
    #[serde(flatten)]
    result: &'a PathResult,
    reachable: bool,
    records: Vec<TitledRecord<'a>>,
}

#[derive(Serialize)]
struct ComponentView<'a> {
    size: usize,
    members: Vec<TitledRecord<'a>>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    node_count: usize,
    edge_count: usize,
    explicit_edges: usize,
    inferred_edges: usize,
    path: Option<PathView<'a>>,
    components: Vec<ComponentView<'a>>,
    singleton_count: usize,
    warnings: &'a [AnalysisWarning],
}

fn path_view<'a>(result: &'a PathResult, records: &'a RecordSet) -> PathView<'a> {
    PathView {
        result,
        reachable: result.is_reachable(),
        records: result
            .path
            .iter()
            .map(|&id| TitledRecord::lookup(records, id))
            .collect(),
    }
}

fn write_pretty<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

/// Writes a full report; only non-trivial components are listed.
pub(crate) fn write_report<W: Write>(
    w: &mut W,
    report: &AnalysisReport,
    records: &RecordSet,
) -> io::Result<()> {
    let view = ReportView {
        node_count: report.node_count,
        edge_count: report.edge_count,
        explicit_edges: report.explicit_edges,
        inferred_edges: report.inferred_edges,
        path: report.path.as_ref().map(|p| path_view(p, records)),
        components: report
            .components
            .non_trivial()
            .map(|members| ComponentView {
                size: members.len(),
                members: members
                    .iter()
                    .map(|&id| TitledRecord::lookup(records, id))
                    .collect(),
            })
            .collect(),
        singleton_count: report.components.singleton_count(),
        warnings: &report.warnings,
    };
    write_pretty(w, &view)
}

pub(crate) fn write_path<W: Write>(
    w: &mut W,
    result: &PathResult,
    records: &RecordSet,
) -> io::Result<()> {
    write_pretty(w, &path_view(result, records))
}

pub(crate) fn write_components<W: Write>(
    w: &mut W,
    components: &[&[RecordId]],
    records: &RecordSet,
) -> io::Result<()> {
    let views: Vec<ComponentView> = components
        .iter()
        .map(|members| ComponentView {
            size: members.len(),
            members: members
                .iter()
                .map(|&id| TitledRecord::lookup(records, id))
                .collect(),
        })
        .collect();
    write_pretty(w, &views)
}

pub(crate) fn write_search<W: Write>(w: &mut W, hits: &[&Record]) -> io::Result<()> {
    let views: Vec<TitledRecord> = hits.iter().map(|&r| TitledRecord::from(r)).collect();
    write_pretty(w, &views)
}

#[derive(Serialize)]
struct NeighborhoodView<'a> {
    center: TitledRecord<'a>,
    outgoing: &'a [NeighborEntry],
    incoming: &'a [NeighborEntry],
}

pub(crate) fn write_neighborhood<W: Write>(
    w: &mut W,
    neighborhood: &Neighborhood,
    records: &RecordSet,
) -> io::Result<()> {
    let view = NeighborhoodView {
        center: TitledRecord::lookup(records, neighborhood.center),
        outgoing: &neighborhood.outgoing,
        incoming: &neighborhood.incoming,
    };
    write_pretty(w, &view)
}
