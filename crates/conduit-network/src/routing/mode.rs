//! Destination selection.

use conduit_graph::Path;
use conduit_topology::Position;
use serde::{Deserialize, Serialize};

use super::DestinationPathCache;
use crate::destination::Destination;
use crate::world::World;

/// How a sender picks among reachable destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Shortest path first
    #[default]
    Nearest,
    /// Longest path first
    Furthest,
    /// Cycle through destinations
    RoundRobin,
}

impl RoutingMode {
    /// All modes.
    pub const ALL: [RoutingMode; 3] = [Self::Nearest, Self::Furthest, Self::RoundRobin];

    /// Mode from a persisted index, falling back to `Nearest`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Furthest,
            2 => Self::RoundRobin,
            _ => Self::Nearest,
        }
    }

    /// Index of this mode.
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Per-sender round-robin position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobinCursor {
    next: usize,
}

impl RoundRobinCursor {
    /// Create a cursor at the first destination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from the first destination.
    pub fn reset(&mut self) {
        self.next = 0;
    }

    fn advance(&mut self, len: usize) -> usize {
        if self.next >= len {
            self.next = 0;
        }
        let picked = self.next;
        self.next += 1;
        picked
    }
}

/// Pick a destination reachable from `from`.
///
/// Only destinations with a cached path that the world still reports usable
/// are candidates; `exclude` (usually the sender's own interface) is skipped.
/// Candidates are considered in `destinations` order, so ties are broken by
/// that order.
pub fn select(
    cache: &DestinationPathCache,
    destinations: &[Destination],
    from: Position,
    mode: RoutingMode,
    cursor: &mut RoundRobinCursor,
    world: &dyn World,
    exclude: Option<&Destination>,
) -> Option<Destination> {
    let candidates: Vec<(&Destination, &Path<Position>)> = destinations
        .iter()
        .filter(|dest| Some(*dest) != exclude)
        .filter(|dest| dest.is_usable(world))
        .filter_map(|dest| cache.path(from, dest).map(|path| (dest, path)))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    match mode {
        RoutingMode::Nearest => candidates
            .iter()
            .enumerate()
            .min_by_key(|(order, (_, path))| (path.len(), *order))
            .map(|(_, (dest, _))| **dest),
        RoutingMode::Furthest => candidates
            .iter()
            .enumerate()
            .max_by_key(|(order, (_, path))| (path.len(), std::cmp::Reverse(*order)))
            .map(|(_, (dest, _))| **dest),
        RoutingMode::RoundRobin => {
            let index = cursor.advance(candidates.len());
            candidates.get(index).map(|(dest, _)| **dest)
        }
    }
}
