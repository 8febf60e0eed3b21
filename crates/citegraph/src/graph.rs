//! Immutable directed weighted citation graph.
//!
//! Backed by a `petgraph` [`DiGraph`] whose node index equals the
//! [`RecordId`] of the record it stands for. The graph is sized once from the
//! record count and never grows. Forward and reverse traversal both run in
//! time proportional to the node's degree.

use crate::domain::RecordId;
use crate::error::{Error, Result};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeOrigin {
    /// Listed in the citing record's explicit citations (or supplied directly).
    Explicit,
    /// Derived from a similarity score at or above the threshold.
    Inferred {
        /// Combined similarity that produced the edge.
        score: f64,
    },
}

impl EdgeOrigin {
    /// Returns `true` for explicit edges.
    #[must_use]
    pub fn is_explicit(self) -> bool {
        matches!(self, Self::Explicit)
    }
}

/// A directed, weighted citation `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Citing record.
    pub from: RecordId,
    /// Cited record.
    pub to: RecordId,
    /// Traversal cost; lower means a stronger relation.
    pub weight: f64,
    /// Where the edge came from.
    pub origin: EdgeOrigin,
}

impl Edge {
    /// Weight carried by every explicit citation.
    pub const EXPLICIT_WEIGHT: f64 = 1.0;

    /// An explicit citation with weight 1.0.
    #[must_use]
    pub fn explicit(from: RecordId, to: RecordId) -> Self {
        Self {
            from,
            to,
            weight: Self::EXPLICIT_WEIGHT,
            origin: EdgeOrigin::Explicit,
        }
    }

    /// An inferred citation weighted `max(floor, 1 - score)`.
    #[must_use]
    pub fn inferred(from: RecordId, to: RecordId, score: f64, floor: f64) -> Self {
        Self {
            from,
            to,
            weight: (1.0 - score).max(floor),
            origin: EdgeOrigin::Inferred { score },
        }
    }

    /// Returns `true` if this edge should replace `other` for the same pair.
    ///
    /// Explicit edges beat inferred ones; otherwise the lower weight wins.
    #[must_use]
    pub fn supersedes(&self, other: &Edge) -> bool {
        match (self.origin.is_explicit(), other.origin.is_explicit()) {
            (true, false) => true,
            (false, true) => false,
            _ => self.weight.total_cmp(&other.weight).is_lt(),
        }
    }
}

/// Iterator over `(neighbor, weight)` pairs of one node.
///
/// Yields neighbors in ascending id order.
pub struct Neighbors<'a> {
    edges: petgraph::graph::Edges<'a, Edge, petgraph::Directed>,
    direction: Direction,
}

impl Iterator for Neighbors<'_> {
    type Item = (RecordId, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().map(|edge_ref| {
            let edge = edge_ref.weight();
            match self.direction {
                Direction::Outgoing => (edge.to, edge.weight),
                Direction::Incoming => (edge.from, edge.weight),
            }
        })
    }
}

/// The citation graph for one analysis run.
#[derive(Debug, Clone)]
pub struct CitationGraph {
    graph: DiGraph<RecordId, Edge>,
}

impl CitationGraph {
    /// Builds a graph from a deduplicated edge list.
    ///
    /// Edges must reference nodes below `node_count` and hold at most one
    /// edge per ordered pair; [`crate::inference`] guarantees both.
    pub(crate) fn build(node_count: usize, mut edges: Vec<Edge>) -> Self {
        let mut graph = DiGraph::with_capacity(node_count, edges.len());
        for id in 0..node_count {
            graph.add_node(RecordId(id));
        }

        // petgraph walks adjacency lists newest-first; inserting in descending
        // (from, to) order makes traversal yield ascending ids.
        edges.sort_by(|a, b| (b.from, b.to).cmp(&(a.from, a.to)));
        for edge in edges {
            graph.add_edge(NodeIndex::new(edge.from.0), NodeIndex::new(edge.to.0), edge);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built citation graph"
        );
        Self { graph }
    }

    /// Builds a graph over `node_count` nodes from `(from, to, weight)` triples.
    ///
    /// Edges are marked explicit. For repeated ordered pairs the lowest
    /// weight is kept. Weights are not checked here; the shortest-path solver
    /// rejects non-positive ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecord`] if an endpoint is not below `node_count`.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut unique: BTreeMap<(RecordId, RecordId), Edge> = BTreeMap::new();
        for (from, to, weight) in edges {
            for endpoint in [from, to] {
                if endpoint >= node_count {
                    return Err(Error::UnknownRecord(RecordId(endpoint)));
                }
            }
            let edge = Edge {
                weight,
                ..Edge::explicit(RecordId(from), RecordId(to))
            };
            unique
                .entry((edge.from, edge.to))
                .and_modify(|kept| {
                    if edge.supersedes(kept) {
                        *kept = edge;
                    }
                })
                .or_insert(edge);
        }
        Ok(Self::build(node_count, unique.into_values().collect()))
    }

    /// Number of nodes (records).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if `id` names a node of this graph.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        id.0 < self.graph.node_count()
    }

    /// Checks that `id` names a node of this graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecord`] otherwise.
    pub fn ensure_contains(&self, id: RecordId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownRecord(id))
        }
    }

    /// Outgoing `(target, weight)` pairs of `id`. Empty for unknown ids.
    #[must_use]
    pub fn neighbors(&self, id: RecordId) -> Neighbors<'_> {
        self.directed(id, Direction::Outgoing)
    }

    /// Incoming `(source, weight)` pairs of `id`. Empty for unknown ids.
    #[must_use]
    pub fn reverse_neighbors(&self, id: RecordId) -> Neighbors<'_> {
        self.directed(id, Direction::Incoming)
    }

    fn directed(&self, id: RecordId, direction: Direction) -> Neighbors<'_> {
        Neighbors {
            edges: self.graph.edges_directed(NodeIndex::new(id.0), direction),
            direction,
        }
    }

    /// Number of edges leaving `id`.
    #[must_use]
    pub fn out_degree(&self, id: RecordId) -> usize {
        self.neighbors(id).count()
    }

    /// Number of edges entering `id`.
    #[must_use]
    pub fn in_degree(&self, id: RecordId) -> usize {
        self.reverse_neighbors(id).count()
    }

    /// The edge `from -> to`, if present.
    #[must_use]
    pub fn edge(&self, from: RecordId, to: RecordId) -> Option<&Edge> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(from.0), NodeIndex::new(to.0))
            .and_then(|index| self.graph.edge_weight(index))
    }

    /// All edges in ascending `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.raw_edges().iter().rev().map(|raw| &raw.weight)
    }

    /// The underlying `petgraph` graph.
    #[must_use]
    pub fn as_petgraph(&self) -> &DiGraph<RecordId, Edge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pairs: impl Iterator<Item = (RecordId, f64)>) -> Vec<usize> {
        pairs.map(|(id, _)| id.0).collect()
    }

    #[test]
    fn neighbors_are_yielded_in_ascending_order() {
        let graph =
            CitationGraph::from_edges(4, [(0, 3, 1.0), (0, 1, 1.0), (0, 2, 1.0), (2, 1, 0.5)])
                .unwrap();

        assert_eq!(ids(graph.neighbors(RecordId(0))), vec![1, 2, 3]);
        assert_eq!(ids(graph.reverse_neighbors(RecordId(1))), vec![0, 2]);
        assert_eq!(graph.out_degree(RecordId(0)), 3);
        assert_eq!(graph.in_degree(RecordId(1)), 2);
        assert_eq!(graph.in_degree(RecordId(0)), 0);
    }

    #[test]
    fn edges_iterate_in_pair_order() {
        let graph = CitationGraph::from_edges(3, [(2, 0, 1.0), (0, 2, 1.0), (0, 1, 1.0)]).unwrap();
        let pairs: Vec<_> = graph.edges().map(|e| (e.from.0, e.to.0)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn from_edges_keeps_lowest_weight_for_repeated_pairs() {
        let graph = CitationGraph::from_edges(2, [(0, 1, 0.9), (0, 1, 0.2), (0, 1, 0.5)]).unwrap();
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edge(RecordId(0), RecordId(1)).unwrap();
        assert!((edge.weight - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn from_edges_rejects_unknown_endpoints() {
        let err = CitationGraph::from_edges(2, [(0, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::UnknownRecord(RecordId(2))));
    }

    #[test]
    fn unknown_ids_have_no_neighbors() {
        let graph = CitationGraph::from_edges(1, []).unwrap();
        assert_eq!(graph.neighbors(RecordId(7)).count(), 0);
        assert!(graph.edge(RecordId(0), RecordId(7)).is_none());
        assert!(graph.ensure_contains(RecordId(7)).is_err());
    }

    #[test]
    fn explicit_edges_supersede_inferred_ones() {
        let explicit = Edge::explicit(RecordId(0), RecordId(1));
        let inferred = Edge::inferred(RecordId(0), RecordId(1), 0.9, 1e-6);
        assert!(explicit.supersedes(&inferred));
        assert!(!inferred.supersedes(&explicit));
        assert!((inferred.weight - 0.1).abs() < 1e-12);
    }

    #[test]
    fn inferred_weight_respects_floor() {
        let edge = Edge::inferred(RecordId(0), RecordId(1), 1.0, 1e-6);
        assert!((edge.weight - 1e-6).abs() < f64::EPSILON);
    }
}
