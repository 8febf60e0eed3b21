//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

use super::validators::{validate_fragment, validate_positive};

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Start the shortest path at this record id
    #[arg(long, requires = "target", conflicts_with_all = ["from_title", "to_title"])]
    pub source: Option<usize>,

    /// End the shortest path at this record id
    #[arg(long, requires = "source")]
    pub target: Option<usize>,

    /// Start the shortest path at the first record whose title contains this text
    #[arg(long, requires = "to_title", value_parser = validate_fragment)]
    pub from_title: Option<String>,

    /// End the shortest path at the first record whose title contains this text
    #[arg(long, requires = "from_title", value_parser = validate_fragment)]
    pub to_title: Option<String>,

    /// List at most this many non-trivial components
    #[arg(long, value_parser = validate_positive)]
    pub max_components: Option<usize>,

    /// Representative titles shown per component
    #[arg(long, default_value = "5", value_parser = validate_positive)]
    pub titles: usize,
}

/// Arguments for the `path` command
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Record id the path starts from
    pub source: usize,

    /// Record id the path should reach
    pub target: usize,
}

/// Arguments for the `components` command
#[derive(Parser, Debug, Clone)]
pub struct ComponentsArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Number of largest components to list
    #[arg(short, long, default_value = "3", value_parser = validate_positive)]
    pub limit: usize,

    /// Representative titles shown per component
    #[arg(long, default_value = "5", value_parser = validate_positive)]
    pub titles: usize,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Text to look for in titles (case and accent insensitive)
    #[arg(value_parser = validate_fragment)]
    pub fragment: String,

    /// Maximum number of hits
    #[arg(short, long, default_value = "10", value_parser = validate_positive)]
    pub limit: usize,
}

/// Arguments for the `neighbors` command
#[derive(Parser, Debug, Clone)]
pub struct NeighborsArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Record id at the center of the ego graph
    pub id: usize,

    /// Maximum edges listed per direction
    #[arg(short, long, default_value = "10", value_parser = validate_positive)]
    pub limit: usize,
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// JSONL file with one record per line
    pub records: PathBuf,

    /// Destination JSONL file for the edge list
    pub output: PathBuf,
}
