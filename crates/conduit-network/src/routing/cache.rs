//! Precomputed shortest paths from every node to every destination.

use std::collections::HashMap;

use conduit_graph::{Dijkstra, Graph, Path};
use conduit_topology::Position;
use tracing::{debug, warn};

use crate::destination::Destination;

/// Source position → destination → shortest path.
///
/// A missing entry means "no path in this topology"; there are no negative
/// entries.
#[derive(Debug, Clone, Default)]
pub struct DestinationPathCache {
    paths: HashMap<Position, HashMap<Destination, Path<Position>>>,
    len: usize,
}

impl DestinationPathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path from `from` to the segment `destination` is attached to.
    pub fn path(&self, from: Position, destination: &Destination) -> Option<&Path<Position>> {
        self.paths.get(&from)?.get(destination)
    }

    /// All cached paths leaving `from`.
    pub fn paths_from(&self, from: Position) -> impl Iterator<Item = (&Destination, &Path<Position>)> {
        self.paths.get(&from).into_iter().flatten()
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn insert(&mut self, from: Position, destination: Destination, path: Path<Position>) {
        if self.paths.entry(from).or_default().insert(destination, path).is_none() {
            self.len += 1;
        }
    }
}

/// Builds a [`DestinationPathCache`] for one graph snapshot.
pub struct DestinationPathCacheBuilder<'a> {
    graph: &'a Graph<Position>,
    destinations: &'a [Destination],
}

impl<'a> DestinationPathCacheBuilder<'a> {
    /// Create a builder over a routing graph and the destinations found with it.
    pub fn new(graph: &'a Graph<Position>, destinations: &'a [Destination]) -> Self {
        Self {
            graph,
            destinations,
        }
    }

    /// Run the solver from every node and collect the paths.
    pub fn build(&self) -> DestinationPathCache {
        let mut cache = DestinationPathCache::new();

        for node in self.graph.nodes() {
            let from = *node.value();
            let mut dijkstra = Dijkstra::new(self.graph);
            dijkstra.execute(node.id());

            for destination in self.destinations {
                if destination.connected == from {
                    cache.insert(from, *destination, Path::trivial(from));
                    continue;
                }

                let Some(target) = self.graph.node_id(&destination.connected) else {
                    warn!(connected = %destination.connected, "Destination segment has no routing node");
                    continue;
                };

                match dijkstra.path_to(target) {
                    Some(path) => {
                        debug!(
                            %from,
                            to = %destination.connected,
                            nodes = path.len(),
                            "Computed path"
                        );
                        cache.insert(from, *destination, path);
                    }
                    None => {
                        warn!(%from, to = %destination.connected, "Could not find path");
                    }
                }
            }
        }

        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_topology::Direction;

    fn line(length: i32) -> Graph<Position> {
        let mut graph = Graph::new();
        let mut previous = None;
        for x in 0..length {
            let id = graph.add_node(Position::new(x, 0, 0));
            if let Some(prev) = previous {
                graph.add_link("link", prev, id, 1).unwrap();
            }
            previous = Some(id);
        }
        graph
    }

    #[test]
    fn path_along_line() {
        let graph = line(3);
        let far = Destination::new(Position::new(2, 0, 0), Direction::East);
        let cache = DestinationPathCacheBuilder::new(&graph, &[far]).build();

        let path = cache.path(Position::ORIGIN, &far).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(*path.target(), Position::new(2, 0, 0));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn destination_on_source_is_trivial() {
        let graph = line(2);
        let here = Destination::new(Position::ORIGIN, Direction::West);
        let cache = DestinationPathCacheBuilder::new(&graph, &[here]).build();
        assert_eq!(cache.path(Position::ORIGIN, &here).unwrap().len(), 1);
    }

    #[test]
    fn disconnected_destination_is_a_miss() {
        let mut graph = Graph::new();
        graph.add_node(Position::new(0, 0, 0));
        graph.add_node(Position::new(2, 0, 0));
        let far = Destination::new(Position::new(2, 0, 0), Direction::East);

        let cache = DestinationPathCacheBuilder::new(&graph, &[far]).build();
        assert!(cache.path(Position::ORIGIN, &far).is_none());
        assert_eq!(cache.paths_from(Position::new(2, 0, 0)).count(), 1);
    }

    #[test]
    fn unknown_destination_segment_is_skipped() {
        let graph = line(2);
        let stray = Destination::new(Position::new(9, 9, 9), Direction::Up);
        let cache = DestinationPathCacheBuilder::new(&graph, &[stray]).build();
        assert!(cache.is_empty());
    }
}
