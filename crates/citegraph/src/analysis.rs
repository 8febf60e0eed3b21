//! One analysis run: records in, graph and solver results out.
//!
//! [`CitationAnalysis::build`] validates the configuration, infers the edge
//! set and freezes it into a [`CitationGraph`]. Queries then run against the
//! read-only graph.

use crate::config::AnalysisConfig;
use crate::domain::{RecordId, RecordSet};
use crate::error::{AnalysisWarning, Error, Result};
use crate::graph::{CitationGraph, EdgeOrigin};
use crate::inference::{DirectionPolicy, EdgeInference};
use crate::paths::{self, PathResult};
use crate::scc::{self, SccResult};
use crate::similarity::{SimilarityBreakdown, SimilarityEstimator};
use serde::Serialize;

/// The citation graph of a record set together with its build warnings.
#[derive(Debug, Clone)]
pub struct CitationAnalysis {
    records: RecordSet,
    graph: CitationGraph,
    warnings: Vec<AnalysisWarning>,
    config: AnalysisConfig,
}

impl CitationAnalysis {
    /// Builds the graph using the configured direction rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` does not
    /// validate, or [`crate::Error::UnknownRecord`] if the configured query
    /// names a record outside the set.
    pub fn build(records: RecordSet, config: &AnalysisConfig) -> Result<Self> {
        let engine = EdgeInference::from_config(config)?;
        Self::assemble(records, config, &engine)
    }

    /// Builds the graph with a custom direction policy.
    ///
    /// # Errors
    ///
    /// Same as [`CitationAnalysis::build`].
    pub fn with_policy<P: DirectionPolicy>(
        records: RecordSet,
        config: &AnalysisConfig,
        policy: P,
    ) -> Result<Self> {
        let engine = EdgeInference::with_policy(config, policy)?;
        Self::assemble(records, config, &engine)
    }

    fn assemble<P: DirectionPolicy>(
        records: RecordSet,
        config: &AnalysisConfig,
        engine: &EdgeInference<P>,
    ) -> Result<Self> {
        if let Some(query) = config.query {
            for id in [query.source, query.target] {
                if records.get(id).is_none() {
                    return Err(Error::UnknownRecord(id));
                }
            }
        }

        let outcome = engine.infer(&records);
        let graph = CitationGraph::build(records.len(), outcome.edges);

        Ok(Self {
            records,
            graph,
            warnings: outcome.warnings,
            config: config.clone(),
        })
    }

    /// The analyzed records.
    #[must_use]
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// The citation graph.
    #[must_use]
    pub fn graph(&self) -> &CitationGraph {
        &self.graph
    }

    /// Anomalies recovered while building the graph.
    #[must_use]
    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    /// The configuration the graph was built with.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Shortest path between two records.
    ///
    /// # Errors
    ///
    /// See [`paths::shortest_path`].
    pub fn shortest_path(&self, source: RecordId, target: RecordId) -> Result<PathResult> {
        paths::shortest_path(&self.graph, source, target)
    }

    /// Strongly connected components of the graph.
    #[must_use]
    pub fn components(&self) -> SccResult {
        scc::strongly_connected_components(&self.graph)
    }

    /// Direct outgoing and incoming edges of `center`.
    ///
    /// Each side is ordered by weight ascending (strongest first), then id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownRecord`] if `center` is not in the set.
    pub fn neighborhood(&self, center: RecordId) -> Result<Neighborhood> {
        self.graph.ensure_contains(center)?;
        let estimator = SimilarityEstimator::new(self.config.weights);

        let entry = |other: RecordId, from: RecordId, to: RecordId| -> Option<NeighborEntry> {
            let edge = self.graph.edge(from, to)?;
            let similarity = match (self.records.get(center), self.records.get(other)) {
                (Some(a), Some(b)) if a.id != b.id => Some(estimator.breakdown(a, b)),
                _ => None,
            };
            Some(NeighborEntry {
                id: other,
                weight: edge.weight,
                origin: edge.origin,
                similarity,
            })
        };

        let mut outgoing: Vec<NeighborEntry> = self
            .graph
            .neighbors(center)
            .filter_map(|(to, _)| entry(to, center, to))
            .collect();
        let mut incoming: Vec<NeighborEntry> = self
            .graph
            .reverse_neighbors(center)
            .filter_map(|(from, _)| entry(from, from, center))
            .collect();

        for side in [&mut outgoing, &mut incoming] {
            side.sort_by(|a, b| a.weight.total_cmp(&b.weight).then(a.id.cmp(&b.id)));
        }

        Ok(Neighborhood {
            center,
            outgoing,
            incoming,
        })
    }

    /// Runs the configured query (if any) and the SCC solver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidWeight`] if the shortest-path solver
    /// meets a non-positive weight.
    pub fn report(&self) -> Result<AnalysisReport> {
        let path = self
            .config
            .query
            .map(|q| self.shortest_path(q.source, q.target))
            .transpose()?;
        Ok(self.report_with_path(path))
    }

    /// Builds a report around an already computed path.
    #[must_use]
    pub fn report_with_path(&self, path: Option<PathResult>) -> AnalysisReport {
        let explicit_edges = self
            .graph
            .edges()
            .filter(|e| e.origin.is_explicit())
            .count();

        AnalysisReport {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            explicit_edges,
            inferred_edges: self.graph.edge_count() - explicit_edges,
            path,
            components: self.components(),
            warnings: self.warnings.clone(),
        }
    }
}

/// One edge of an ego graph, seen from its center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborEntry {
    /// The record at the other end of the edge.
    pub id: RecordId,
    /// Edge weight.
    pub weight: f64,
    /// How the edge came to exist.
    pub origin: EdgeOrigin,
    /// Similarity components between the center and this record.
    pub similarity: Option<SimilarityBreakdown>,
}

/// A record with its direct outgoing and incoming edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    /// The record the ego graph is centered on.
    pub center: RecordId,
    /// Records `center` cites.
    pub outgoing: Vec<NeighborEntry>,
    /// Records citing `center`.
    pub incoming: Vec<NeighborEntry>,
}

/// Everything a full analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Number of records.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Edges taken from explicit citations.
    pub explicit_edges: usize,
    /// Edges inferred from similarity.
    pub inferred_edges: usize,
    /// Shortest path, when a query was given.
    pub path: Option<PathResult>,
    /// Strongly connected components.
    pub components: SccResult,
    /// Anomalies recovered while building the graph.
    pub warnings: Vec<AnalysisWarning>,
}
