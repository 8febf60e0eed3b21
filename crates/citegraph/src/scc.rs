//! Strongly connected components (Kosaraju).
//!
//! Both depth-first passes are iterative, so deep citation chains cannot
//! overflow the call stack. Components are returned in a topological order
//! of the condensation graph: a component comes before every component it
//! has an edge into. Members are sorted ascending.

use crate::domain::RecordId;
use crate::graph::{CitationGraph, Neighbors};
use serde::Serialize;

const UNASSIGNED: usize = usize::MAX;

/// The strongly connected components of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccResult {
    components: Vec<Vec<RecordId>>,
    #[serde(skip)]
    membership: Vec<usize>,
}

impl SccResult {
    /// All components, citing clusters before the clusters they cite.
    #[must_use]
    pub fn components(&self) -> &[Vec<RecordId>] {
        &self.components
    }

    /// Consumes the result, returning the components.
    #[must_use]
    pub fn into_components(self) -> Vec<Vec<RecordId>> {
        self.components
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` for the empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of the component containing `id`.
    #[must_use]
    pub fn component_of(&self, id: RecordId) -> Option<usize> {
        self.membership.get(id.0).copied()
    }

    /// Returns `true` if `a` and `b` lie in the same component.
    #[must_use]
    pub fn same_component(&self, a: RecordId, b: RecordId) -> bool {
        matches!((self.component_of(a), self.component_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// The `k` largest components, by size descending then first member.
    #[must_use]
    pub fn largest(&self, k: usize) -> Vec<&[RecordId]> {
        let mut ranked: Vec<&[RecordId]> = self.components.iter().map(Vec::as_slice).collect();
        ranked.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));
        ranked.truncate(k);
        ranked
    }

    /// Components with more than one member, in result order.
    pub fn non_trivial(&self) -> impl Iterator<Item = &[RecordId]> {
        self.components
            .iter()
            .filter(|c| c.len() > 1)
            .map(Vec::as_slice)
    }

    /// Number of single-member components.
    #[must_use]
    pub fn singleton_count(&self) -> usize {
        self.components.iter().filter(|c| c.len() == 1).count()
    }
}

/// Computes the strongly connected components of `graph`.
#[must_use]
pub fn strongly_connected_components(graph: &CitationGraph) -> SccResult {
    let n = graph.node_count();
    let finish_order = finish_order(graph);

    let mut membership = vec![UNASSIGNED; n];
    let mut components = Vec::new();
    let mut stack: Vec<(RecordId, Neighbors<'_>)> = Vec::new();

    for &root in finish_order.iter().rev() {
        if membership[root.0] != UNASSIGNED {
            continue;
        }
        let index = components.len();
        let mut members = vec![root];
        membership[root.0] = index;
        stack.push((root, graph.reverse_neighbors(root)));

        while let Some((_, predecessors)) = stack.last_mut() {
            match predecessors.find(|(id, _)| membership[id.0] == UNASSIGNED) {
                Some((next, _)) => {
                    membership[next.0] = index;
                    members.push(next);
                    stack.push((next, graph.reverse_neighbors(next)));
                }
                None => {
                    stack.pop();
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    tracing::debug!(
        nodes = n,
        components = components.len(),
        "Computed strongly connected components"
    );
    SccResult {
        components,
        membership,
    }
}

/// First pass: nodes in order of DFS completion, roots in ascending id order.
fn finish_order(graph: &CitationGraph) -> Vec<RecordId> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut stack: Vec<(RecordId, Neighbors<'_>)> = Vec::new();

    for root in (0..n).map(RecordId) {
        if visited[root.0] {
            continue;
        }
        visited[root.0] = true;
        stack.push((root, graph.neighbors(root)));

        while let Some((node, successors)) = stack.last_mut() {
            let node = *node;
            match successors.find(|(id, _)| !visited[id.0]) {
                Some((next, _)) => {
                    visited[next.0] = true;
                    stack.push((next, graph.neighbors(next)));
                }
                None => {
                    stack.pop();
                    order.push(node);
                }
            }
        }
    }
    order
}
