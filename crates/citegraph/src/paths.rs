//! Single-source shortest paths (Dijkstra).
//!
//! Uses a binary heap keyed by tentative distance. Entries with equal
//! distance pop in the order they were pushed, so results are reproducible
//! for a given graph. Weights are checked as edges are relaxed: a zero,
//! negative or non-finite weight aborts the search with
//! [`Error::InvalidWeight`].

use crate::domain::RecordId;
use crate::error::{Error, Result};
use crate::graph::CitationGraph;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Outcome of a single shortest-path query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Where the search started.
    pub source: RecordId,
    /// Record the path was asked to reach.
    pub target: RecordId,
    /// Total weight of the path; infinite if `target` is unreachable.
    #[serde(serialize_with = "finite_or_null")]
    pub distance: f64,
    /// Records from `source` to `target` inclusive; empty if unreachable.
    pub path: Vec<RecordId>,
    /// Distance from `source` to each record of `path`.
    pub cumulative: Vec<f64>,
}

impl PathResult {
    /// Returns `true` if a path was found.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }

    /// Number of edges on the path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

/// Distances and predecessors from one source to every node.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    source: RecordId,
    distances: Vec<f64>,
    predecessors: Vec<Option<RecordId>>,
}

impl ShortestPathTree {
    /// The source of the search.
    #[must_use]
    pub fn source(&self) -> RecordId {
        self.source
    }

    /// Distance to `id`; infinite if unreachable or unknown.
    #[must_use]
    pub fn distance(&self, id: RecordId) -> f64 {
        self.distances.get(id.0).copied().unwrap_or(f64::INFINITY)
    }

    /// Predecessor of `id` on its shortest path.
    #[must_use]
    pub fn predecessor(&self, id: RecordId) -> Option<RecordId> {
        self.predecessors.get(id.0).copied().flatten()
    }

    /// Number of nodes reachable from the source, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Extracts the path to `target`.
    #[must_use]
    pub fn path_to(&self, target: RecordId) -> PathResult {
        let distance = self.distance(target);
        if !distance.is_finite() {
            return PathResult {
                source: self.source,
                target,
                distance: f64::INFINITY,
                path: Vec::new(),
                cumulative: Vec::new(),
            };
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = self.predecessor(current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        let cumulative = path.iter().map(|&id| self.distance(id)).collect();

        PathResult {
            source: self.source,
            target,
            distance,
            path,
            cumulative,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    distance: f64,
    seq: u64,
    node: RecordId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Reversed: BinaryHeap is a max-heap and we pop the smallest distance,
    // then the earliest push.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Search<'g> {
    graph: &'g CitationGraph,
    distances: Vec<f64>,
    predecessors: Vec<Option<RecordId>>,
    settled: Vec<bool>,
    heap: BinaryHeap<HeapEntry>,
    seq: u64,
}

impl<'g> Search<'g> {
    fn new(graph: &'g CitationGraph, source: RecordId) -> Self {
        let n = graph.node_count();
        let mut search = Self {
            graph,
            distances: vec![f64::INFINITY; n],
            predecessors: vec![None; n],
            settled: vec![false; n],
            heap: BinaryHeap::new(),
            seq: 0,
        };
        search.distances[source.0] = 0.0;
        search.push(source, 0.0);
        search
    }

    fn push(&mut self, node: RecordId, distance: f64) {
        self.heap.push(HeapEntry {
            distance,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    /// Settles nodes until `stop_at` is finalized or the heap drains.
    fn run(&mut self, stop_at: Option<RecordId>) -> Result<()> {
        while let Some(HeapEntry { distance, node, .. }) = self.heap.pop() {
            if self.settled[node.0] {
                continue;
            }
            self.settled[node.0] = true;
            if Some(node) == stop_at {
                break;
            }

            for (next, weight) in self.graph.neighbors(node) {
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(Error::InvalidWeight {
                        from: node,
                        to: next,
                        weight,
                    });
                }
                let candidate = distance + weight;
                if candidate < self.distances[next.0] {
                    self.distances[next.0] = candidate;
                    self.predecessors[next.0] = Some(node);
                    self.push(next, candidate);
                }
            }
        }
        Ok(())
    }

    fn into_tree(self, source: RecordId) -> ShortestPathTree {
        ShortestPathTree {
            source,
            distances: self.distances,
            predecessors: self.predecessors,
        }
    }
}

/// Shortest path from `source` to `target`.
///
/// An unreachable target yields an infinite distance and an empty path.
///
/// # Errors
///
/// Returns [`Error::UnknownRecord`] if either id is not in the graph, or
/// [`Error::InvalidWeight`] if the search relaxes a non-positive or
/// non-finite edge.
pub fn shortest_path(
    graph: &CitationGraph,
    source: RecordId,
    target: RecordId,
) -> Result<PathResult> {
    graph.ensure_contains(source)?;
    graph.ensure_contains(target)?;

    let mut search = Search::new(graph, source);
    search.run(Some(target))?;
    let result = search.into_tree(source).path_to(target);

    tracing::debug!(
        %source,
        %target,
        reachable = result.is_reachable(),
        hops = result.hops(),
        "Shortest path search finished"
    );
    Ok(result)
}

/// Distances and predecessors from `source` to every reachable node.
///
/// # Errors
///
/// Returns [`Error::UnknownRecord`] if `source` is not in the graph, or
/// [`Error::InvalidWeight`] if any reachable edge has a non-positive or
/// non-finite weight.
pub fn shortest_path_tree(graph: &CitationGraph, source: RecordId) -> Result<ShortestPathTree> {
    graph.ensure_contains(source)?;

    let mut search = Search::new(graph, source);
    search.run(None)?;
    Ok(search.into_tree(source))
}
