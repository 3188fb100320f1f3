//! Routing destinations.

use conduit_topology::{Direction, Position};
use serde::{Deserialize, Serialize};

use crate::world::World;

/// An external interface reachable from a network.
///
/// `connected` is the segment the interface touches and `direction` the face
/// of that segment it sits on. Whether it can accept anything right now is up
/// to the world, so usability is re-checked on every routing decision rather
/// than cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Destination {
    /// Segment adjacent to the interface
    pub connected: Position,
    /// Face of `connected` the interface is on
    pub direction: Direction,
}

impl Destination {
    /// Create a destination.
    pub const fn new(connected: Position, direction: Direction) -> Self {
        Self {
            connected,
            direction,
        }
    }

    /// Cell holding the interface.
    pub fn receiver(&self) -> Position {
        self.connected.offset(self.direction)
    }

    /// Face of the receiver things arrive through.
    pub fn incoming_direction(&self) -> Direction {
        self.direction.opposite()
    }

    /// Whether the world still exposes an interface here.
    pub fn is_usable(&self, world: &dyn World) -> bool {
        world.has_capability(self.connected, self.direction)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} via {}", self.connected, self.direction)
    }
}
