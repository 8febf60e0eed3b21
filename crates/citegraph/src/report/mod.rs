//! Rendering of analysis results for people and programs.
//!
//! Text output resolves record ids to titles and is styled with
//! [`color`] helpers; JSON output serializes the same data with titles
//! attached. Layout is a presentation concern: nothing here feeds back into
//! the analysis.
//!
//! Submodules:
//! - [`color`]: semantic styling helpers
//! - `json`: serializable views with record titles

pub mod color;
mod json;

use crate::analysis::{AnalysisReport, NeighborEntry, Neighborhood};
use crate::domain::{Record, RecordId, RecordSet};
use crate::graph::EdgeOrigin;
use crate::paths::PathResult;
use crate::scc::SccResult;
use color::{bold, dimmed, distance, failure, record_id, warning};
use std::env;
use std::io::{self, Write};

const DEFAULT_TERMINAL_WIDTH: usize = 100;
const MIN_CONTENT_WIDTH: usize = 40;

/// Representative titles shown per component by default.
pub const DEFAULT_COMPONENT_TITLES: usize = 5;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Presentation settings for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Maximum line width; longer titles are truncated.
    pub max_width: usize,
    /// Whether to emit ANSI colors.
    pub use_colors: bool,
    /// Titles listed per component before eliding the rest.
    pub max_component_titles: usize,
    /// Components listed in a full report; `None` lists all non-trivial ones.
    pub max_components: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_TERMINAL_WIDTH,
            use_colors: true,
            max_component_titles: DEFAULT_COMPONENT_TITLES,
            max_components: None,
        }
    }
}

impl ReportOptions {
    /// Reads options from the environment.
    ///
    /// Reads:
    /// - `CITEGRAPH_MAX_WIDTH`: maximum line width (default: terminal width)
    /// - `NO_COLOR`: any value disables colors
    /// - `CITEGRAPH_COLOR`: set to "0" or "false" to disable colors
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = match env::var("CITEGRAPH_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse::<usize>() {
                Ok(width) => width.max(MIN_CONTENT_WIDTH),
                Err(_) => {
                    tracing::warn!(
                        env_var = "CITEGRAPH_MAX_WIDTH",
                        value = %s,
                        "Invalid value, using terminal width"
                    );
                    terminal_width()
                }
            },
            _ => terminal_width(),
        };

        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("CITEGRAPH_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_colors,
            ..Self::default()
        }
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(DEFAULT_TERMINAL_WIDTH, |(w, _)| usize::from(w.0))
        .max(MIN_CONTENT_WIDTH)
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

fn title_of(records: &RecordSet, id: RecordId) -> String {
    records
        .get(id)
        .map_or_else(|| format!("(unknown record {id})"), Record::label)
}

/// `  [id] title`, truncated to the configured width.
fn write_record_line<W: Write>(
    w: &mut W,
    indent: &str,
    records: &RecordSet,
    id: RecordId,
    options: &ReportOptions,
) -> io::Result<()> {
    let prefix_len = indent.len() + id.to_string().len() + 3;
    let title = truncate(
        &title_of(records, id),
        options.max_width.saturating_sub(prefix_len),
    );
    writeln!(w, "{indent}{} {title}", record_id(id, options))
}

/// Writes a full analysis report.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_report<W: Write>(
    w: &mut W,
    report: &AnalysisReport,
    records: &RecordSet,
    mode: OutputMode,
    options: &ReportOptions,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => json::write_report(w, report, records),
        OutputMode::Text => write_report_text(w, report, records, options),
    }
}

fn write_report_text<W: Write>(
    w: &mut W,
    report: &AnalysisReport,
    records: &RecordSet,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Citation graph", options))?;
    writeln!(
        w,
        "  {} {}",
        dimmed("records:", options),
        report.node_count
    )?;
    writeln!(
        w,
        "  {} {} ({} explicit, {} inferred)",
        dimmed("edges:  ", options),
        report.edge_count,
        report.explicit_edges,
        report.inferred_edges
    )?;

    if let Some(path) = &report.path {
        writeln!(w)?;
        write_path_text(w, path, records, options)?;
    }

    writeln!(w)?;
    let limit = options.max_components.unwrap_or(usize::MAX);
    let listed: Vec<&[RecordId]> = report.components.non_trivial().take(limit).collect();
    write_components_text(w, &report.components, &listed, records, options)?;

    if !report.warnings.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            bold(&format!("Warnings ({})", report.warnings.len()), options)
        )?;
        let wrap = textwrap::Options::new(options.max_width)
            .initial_indent("  ! ")
            .subsequent_indent("    ");
        for item in &report.warnings {
            for line in textwrap::wrap(&item.to_string(), &wrap) {
                writeln!(w, "{}", warning(&line, options))?;
            }
        }
    }
    Ok(())
}

/// Writes a shortest-path result.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_path<W: Write>(
    w: &mut W,
    result: &PathResult,
    records: &RecordSet,
    mode: OutputMode,
    options: &ReportOptions,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => json::write_path(w, result, records),
        OutputMode::Text => write_path_text(w, result, records, options),
    }
}

fn write_path_text<W: Write>(
    w: &mut W,
    result: &PathResult,
    records: &RecordSet,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} -> {}",
        bold("Shortest path", options),
        record_id(result.source, options),
        record_id(result.target, options)
    )?;

    if !result.is_reachable() {
        writeln!(
            w,
            "  {}",
            failure(
                &format!("no path from {} to {}", result.source, result.target),
                options
            )
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "  {} {} over {} hop(s)",
        dimmed("distance", options),
        distance(result.distance, options),
        result.hops()
    )?;
    for (id, cumulative) in result.path.iter().zip(&result.cumulative) {
        write!(w, "  {} ", distance(*cumulative, options))?;
        write_record_line(w, "", records, *id, &ReportOptions {
            max_width: options.max_width.saturating_sub(9),
            ..options.clone()
        })?;
    }
    Ok(())
}

/// Writes the `limit` largest strongly connected components.
///
/// Singleton components are only counted, never listed.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_components<W: Write>(
    w: &mut W,
    components: &SccResult,
    records: &RecordSet,
    limit: usize,
    mode: OutputMode,
    options: &ReportOptions,
) -> io::Result<()> {
    let listed: Vec<&[RecordId]> = components
        .largest(limit)
        .into_iter()
        .filter(|c| c.len() > 1)
        .collect();
    match mode {
        OutputMode::Json => json::write_components(w, &listed, records),
        OutputMode::Text => write_components_text(w, components, &listed, records, options),
    }
}

fn write_components_text<W: Write>(
    w: &mut W,
    components: &SccResult,
    listed: &[&[RecordId]],
    records: &RecordSet,
    options: &ReportOptions,
) -> io::Result<()> {
    let non_trivial = components.non_trivial().count();
    writeln!(w, "{}", bold("Strongly connected components", options))?;
    writeln!(
        w,
        "  {} total, {} with more than one record, {} singleton(s)",
        components.len(),
        non_trivial,
        components.singleton_count()
    )?;

    for (index, members) in listed.iter().enumerate() {
        writeln!(
            w,
            "  {} {}",
            bold(&format!("#{}", index + 1), options),
            dimmed(&format!("({} records)", members.len()), options)
        )?;
        for &id in members.iter().take(options.max_component_titles) {
            write_record_line(w, "    - ", records, id, options)?;
        }
        let hidden = members.len().saturating_sub(options.max_component_titles);
        if hidden > 0 {
            writeln!(w, "    {}", dimmed(&format!("... and {hidden} more"), options))?;
        }
    }

    let unlisted = non_trivial.saturating_sub(listed.len());
    if unlisted > 0 {
        writeln!(
            w,
            "  {}",
            dimmed(&format!("({unlisted} more component(s) not shown)"), options)
        )?;
    }
    Ok(())
}

/// Writes title search hits.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_search<W: Write>(
    w: &mut W,
    fragment: &str,
    hits: &[&Record],
    records: &RecordSet,
    mode: OutputMode,
    options: &ReportOptions,
) -> io::Result<()> {
    if mode == OutputMode::Json {
        return json::write_search(w, hits);
    }

    if hits.is_empty() {
        writeln!(w, "No records match '{fragment}'.")?;
        return Ok(());
    }
    writeln!(w, "Found {} record(s) matching '{fragment}':", hits.len())?;
    for record in hits {
        write_record_line(w, "  ", records, record.id, options)?;
    }
    Ok(())
}

/// Writes an ego graph, strongest edges first.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_neighborhood<W: Write>(
    w: &mut W,
    neighborhood: &Neighborhood,
    records: &RecordSet,
    limit: usize,
    mode: OutputMode,
    options: &ReportOptions,
) -> io::Result<()> {
    if mode == OutputMode::Json {
        return json::write_neighborhood(w, neighborhood, records);
    }

    write_record_line(w, "", records, neighborhood.center, options)?;
    for (label, entries) in [
        ("Cites", &neighborhood.outgoing),
        ("Cited by", &neighborhood.incoming),
    ] {
        writeln!(
            w,
            "  {} {}",
            bold(label, options),
            dimmed(&format!("({})", entries.len()), options)
        )?;
        if entries.is_empty() {
            writeln!(w, "    {}", dimmed("none", options))?;
            continue;
        }
        for entry in entries.iter().take(limit) {
            write!(
                w,
                "    {} {} ",
                distance(entry.weight, options),
                dimmed(origin_tag(entry), options)
            )?;
            write_record_line(w, "", records, entry.id, &ReportOptions {
                max_width: options.max_width.saturating_sub(24),
                ..options.clone()
            })?;
        }
        let hidden = entries.len().saturating_sub(limit);
        if hidden > 0 {
            writeln!(w, "    {}", dimmed(&format!("... and {hidden} more"), options))?;
        }
    }
    Ok(())
}

fn origin_tag(entry: &NeighborEntry) -> &'static str {
    match entry.origin {
        EdgeOrigin::Explicit => "explicit",
        EdgeOrigin::Inferred { .. } => "inferred",
    }
}
