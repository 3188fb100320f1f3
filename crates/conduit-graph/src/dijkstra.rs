//! Single-source shortest paths.
//!
//! Classic relaxation with a binary heap keyed by tentative distance. Stale
//! heap entries are skipped on pop instead of being decreased in place.
//! Ties are broken by node handle, so repeated runs over the same graph
//! produce the same predecessor tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

use crate::{Edge, Graph, NodeId, Path};

/// Shortest-path solver bound to one graph.
#[derive(Debug)]
pub struct Dijkstra<'g, T> {
    graph: &'g Graph<T>,
    source: Option<NodeId>,
    distances: Vec<Option<u64>>,
    predecessors: Vec<Option<NodeId>>,
}

impl<'g, T: Clone + Eq + Hash> Dijkstra<'g, T> {
    /// Create a solver for `graph`. Nothing is computed until [`Dijkstra::execute`].
    pub fn new(graph: &'g Graph<T>) -> Self {
        Self {
            graph,
            source: None,
            distances: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    /// Run from `source` using each edge's own weight.
    pub fn execute(&mut self, source: NodeId) {
        self.execute_with(source, |edge| edge.weight);
    }

    /// Run from `source` with a caller-supplied edge weight.
    ///
    /// Replaces the results of any previous run.
    pub fn execute_with<W>(&mut self, source: NodeId, weight: W)
    where
        W: Fn(&Edge) -> u64,
    {
        let graph = self.graph;
        let count = graph.node_count();
        self.distances = vec![None; count];
        self.predecessors = vec![None; count];
        self.source = None;

        if source.index() >= count {
            return;
        }
        self.source = Some(source);
        self.distances[source.index()] = Some(0);

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0u64, source)));

        while let Some(Reverse((dist, node))) = heap.pop() {
            // Stale entry; a shorter route was already settled
            if self.distances[node.index()].is_some_and(|best| dist > best) {
                continue;
            }

            for edge in graph.outgoing(node) {
                let candidate = dist.saturating_add(weight(edge));
                let slot = edge.to.index();
                let improves = match self.distances[slot] {
                    None => true,
                    Some(current) => candidate < current,
                };
                if improves {
                    self.distances[slot] = Some(candidate);
                    self.predecessors[slot] = Some(node);
                    heap.push(Reverse((candidate, edge.to)));
                }
            }
        }
    }

    /// Source of the last run.
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    /// Total weight of the shortest route to `target`, if reachable.
    pub fn distance_to(&self, target: NodeId) -> Option<u64> {
        self.distances.get(target.index()).copied().flatten()
    }

    /// Whether `target` was reached by the last run.
    pub fn reaches(&self, target: NodeId) -> bool {
        self.distance_to(target).is_some()
    }

    /// Reconstruct the shortest path to `target`.
    ///
    /// Returns `None` if the solver has not run or `target` is unreachable.
    pub fn path_to(&self, target: NodeId) -> Option<Path<T>> {
        let source = self.source?;
        self.distance_to(target)?;

        let mut reversed = vec![target];
        let mut current = target;
        while current != source {
            current = self.predecessors[current.index()]?;
            reversed.push(current);
        }

        let nodes = reversed
            .into_iter()
            .rev()
            .map(|id| self.graph.value(id).cloned())
            .collect::<Option<Vec<T>>>()?;
        Path::new(nodes)
    }
}
