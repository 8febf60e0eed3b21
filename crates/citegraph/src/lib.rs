//! # Citegraph: citation graphs over bibliographic records
//!
//! Citegraph takes a deduplicated set of bibliographic records, builds a
//! directed weighted citation graph from explicit citations and (where those
//! are missing) title/author/keyword similarity, and analyzes it with
//! Dijkstra shortest paths and Kosaraju strongly connected components.
//!
//! ## Pipeline
//!
//! Records → similarity → edge inference → graph → {shortest path, SCC} → report
//!
//! ## Quick Start
//!
//! ```
//! use citegraph::{AnalysisConfig, CitationAnalysis, Record, RecordId, RecordSet};
//!
//! let records = RecordSet::new(vec![
//!     Record::new(0, "Attention is all you need").with_year(Some(2017)),
//!     Record::new(1, "Transformers for citation analysis").with_citations([0]),
//! ])?;
//!
//! let analysis = CitationAnalysis::build(records, &AnalysisConfig::default())?;
//! let path = analysis.shortest_path(RecordId(1), RecordId(0))?;
//! assert_eq!(path.path, vec![RecordId(1), RecordId(0)]);
//! # Ok::<(), citegraph::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod inference;
pub mod loader;
pub mod paths;
pub mod report;
pub mod scc;
pub mod similarity;

// Public CLI module (needed by binary)
pub mod cli;

pub use analysis::{AnalysisReport, CitationAnalysis, NeighborEntry, Neighborhood};
pub use config::{AnalysisConfig, PathQuery, SimilarityWeights};
pub use domain::{RawRecord, Record, RecordId, RecordSet};
pub use error::{AnalysisWarning, Error, Result};
pub use graph::{CitationGraph, Edge, EdgeOrigin};
pub use inference::{DirectionPolicy, DirectionRule, EdgeInference, InferenceOutcome, infer_edges};
pub use paths::{PathResult, ShortestPathTree, shortest_path, shortest_path_tree};
pub use scc::{SccResult, strongly_connected_components};
pub use similarity::{SimilarityBreakdown, SimilarityEstimator};
