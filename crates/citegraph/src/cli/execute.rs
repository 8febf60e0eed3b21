//! Command execution logic.

use anyhow::{Result, bail};
use std::io::{self, Write};
use std::path::Path;

use super::args::{
    AnalyzeArgs, ComponentsArgs, ExportArgs, NeighborsArgs, PathArgs, SearchArgs,
};
use crate::analysis::CitationAnalysis;
use crate::config::{AnalysisConfig, PathQuery};
use crate::domain::{RecordId, RecordSet};
use crate::loader::{self, LoadWarning};
use crate::report::{self, OutputMode, ReportOptions, color};

/// Load records and tell the user about skipped lines.
async fn load(path: &Path, options: &ReportOptions) -> Result<RecordSet> {
    let (records, warnings) = loader::load_records(path).await?;
    print_load_warnings(path, &warnings, options)?;
    Ok(records)
}

fn print_load_warnings(path: &Path, warnings: &[LoadWarning], options: &ReportOptions) -> Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut err = stderr.lock();
    writeln!(
        err,
        "{}: skipped {} malformed line(s) in {}",
        color::warning("warning", options),
        warnings.len(),
        path.display()
    )?;
    for warning in warnings {
        writeln!(err, "  {}", color::dimmed(&warning.to_string(), options))?;
    }
    Ok(())
}

/// Resolve the path query from ids or title fragments.
fn resolve_query(args: &AnalyzeArgs, records: &RecordSet) -> Result<Option<PathQuery>> {
    if let (Some(source), Some(target)) = (args.source, args.target) {
        return Ok(Some(PathQuery {
            source: RecordId(source),
            target: RecordId(target),
        }));
    }

    if let (Some(from), Some(to)) = (&args.from_title, &args.to_title) {
        let find = |fragment: &str| -> Result<RecordId> {
            match records.search_by_title(fragment, 1).first() {
                Some(record) => Ok(record.id),
                None => bail!("no record title contains '{fragment}'"),
            }
        };
        return Ok(Some(PathQuery {
            source: find(from)?,
            target: find(to)?,
        }));
    }

    Ok(None)
}

/// Execute the analyze command
pub async fn execute_analyze(
    args: &AnalyzeArgs,
    mut config: AnalysisConfig,
    mode: OutputMode,
) -> Result<()> {
    let options = ReportOptions {
        max_component_titles: args.titles,
        max_components: args.max_components,
        ..ReportOptions::from_env()
    };
    let records = load(&args.records, &options).await?;

    if let Some(query) = resolve_query(args, &records)? {
        config.query = Some(query);
    }

    let analysis = CitationAnalysis::build(records, &config)?;
    let report = analysis.report()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_report(&mut out, &report, analysis.records(), mode, &options)?;
    Ok(())
}

/// Execute the path command
pub async fn execute_path(args: &PathArgs, config: AnalysisConfig, mode: OutputMode) -> Result<()> {
    let options = ReportOptions::from_env();
    let records = load(&args.records, &options).await?;
    let analysis = CitationAnalysis::build(records, &config)?;
    let result = analysis.shortest_path(RecordId(args.source), RecordId(args.target))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_path(&mut out, &result, analysis.records(), mode, &options)?;
    Ok(())
}

/// Execute the components command
pub async fn execute_components(
    args: &ComponentsArgs,
    config: AnalysisConfig,
    mode: OutputMode,
) -> Result<()> {
    let options = ReportOptions {
        max_component_titles: args.titles,
        ..ReportOptions::from_env()
    };
    let records = load(&args.records, &options).await?;
    let analysis = CitationAnalysis::build(records, &config)?;
    let components = analysis.components();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_components(
        &mut out,
        &components,
        analysis.records(),
        args.limit,
        mode,
        &options,
    )?;
    Ok(())
}

/// Execute the search command
pub async fn execute_search(args: &SearchArgs, mode: OutputMode) -> Result<()> {
    let options = ReportOptions::from_env();
    let records = load(&args.records, &options).await?;
    let hits = records.search_by_title(&args.fragment, args.limit);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_search(&mut out, &args.fragment, &hits, &records, mode, &options)?;
    Ok(())
}

/// Execute the neighbors command
pub async fn execute_neighbors(
    args: &NeighborsArgs,
    config: AnalysisConfig,
    mode: OutputMode,
) -> Result<()> {
    let options = ReportOptions::from_env();
    let records = load(&args.records, &options).await?;
    let analysis = CitationAnalysis::build(records, &config)?;
    let neighborhood = analysis.neighborhood(RecordId(args.id))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_neighborhood(
        &mut out,
        &neighborhood,
        analysis.records(),
        args.limit,
        mode,
        &options,
    )?;
    Ok(())
}

/// Execute the export command
pub async fn execute_export(args: &ExportArgs, config: AnalysisConfig) -> Result<()> {
    let options = ReportOptions::from_env();
    let records = load(&args.records, &options).await?;
    let analysis = CitationAnalysis::build(records, &config)?;
    let written = loader::export_edges(&args.output, analysis.graph().edges()).await?;

    println!("Wrote {written} edge(s) to {}", args.output.display());
    Ok(())
}
