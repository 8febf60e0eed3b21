//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `analyze`: full report (counts, shortest path, components, warnings)
//! - `path`: shortest path between two records
//! - `components`: largest strongly connected components
//! - `search`: find records by title
//! - `neighbors`: ego graph of one record
//! - `export`: write the edge list as JSONL
//!
//! # Global Flags
//!
//! - `--config`: YAML analysis configuration
//! - `--threshold`, `--max-outgoing`, `--direction`, `--sequential`: override
//!   configuration values
//! - `--json`: output in JSON format
//! - `-v`: increase log verbosity (repeatable)
//!
//! # Example
//!
//! ```bash
//! citegraph analyze records.jsonl --source 0 --target 12
//! citegraph --threshold 0.5 components records.jsonl --limit 5
//! citegraph search records.jsonl "neural networks"
//! citegraph export records.jsonl edges.jsonl
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AnalysisConfig;
use crate::report::OutputMode;

pub use args::{
    AnalyzeArgs, ComponentsArgs, ExportArgs, NeighborsArgs, PathArgs, SearchArgs,
};
pub use types::DirectionArg;
pub use validators::{validate_fragment, validate_positive, validate_threshold};

/// Citegraph - citation graphs over bibliographic records
///
/// Builds a directed, weighted citation graph from explicit citations and
/// title/author/keyword similarity, then answers shortest-path and
/// strongly-connected-component queries.
#[derive(Parser, Debug)]
#[command(name = "citegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// YAML file with analysis configuration
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum similarity for an inferred edge, in (0, 1]
    #[arg(long, global = true, value_parser = validate_threshold)]
    pub threshold: Option<f64>,

    /// Keep only this many strongest inferred edges per record
    #[arg(long, global = true, value_parser = validate_positive)]
    pub max_outgoing: Option<usize>,

    /// Rule deciding which record of a pair may cite the other
    #[arg(long, global = true, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Run the similarity sweep on a single thread
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the graph and print a full report
    ///
    /// Prints node and edge counts, the shortest path when a source and
    /// target are given, the non-trivial strongly connected components and
    /// any warnings raised while building the graph.
    Analyze(AnalyzeArgs),

    /// Find the cheapest citation path between two records
    Path(PathArgs),

    /// List the largest strongly connected components
    Components(ComponentsArgs),

    /// Find records by title
    ///
    /// Matching ignores case, accents and punctuation.
    Search(SearchArgs),

    /// Show the records a record cites and is cited by
    Neighbors(NeighborsArgs),

    /// Write the final edge list as JSONL
    Export(ExportArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter implied by `-v` when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// Loads the configuration file (if any) and applies flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the result does not
    /// validate.
    pub async fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path).await?,
            None => AnalysisConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(limit) = self.max_outgoing {
            config.max_outgoing_per_node = Some(limit);
        }
        if let Some(direction) = self.direction {
            config.direction = direction.into();
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if loading, analysis or output fails.
    pub async fn execute(&self) -> Result<()> {
        let config = self.resolve_config().await?;
        let mode = self.output_mode();

        match &self.command {
            Commands::Analyze(args) => execute::execute_analyze(args, config, mode).await,
            Commands::Path(args) => execute::execute_path(args, config, mode).await,
            Commands::Components(args) => execute::execute_components(args, config, mode).await,
            Commands::Search(args) => execute::execute_search(args, mode).await,
            Commands::Neighbors(args) => execute::execute_neighbors(args, config, mode).await,
            Commands::Export(args) => execute::execute_export(args, config).await,
        }
    }
}
