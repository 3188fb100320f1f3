//! Host world interfaces.
//!
//! The network core never looks at terrain or blocks directly. Whatever owns
//! the world answers two questions per face of a cell:
//!
//! - may a conduit link cross this face? (a segment can have a face closed
//!   off by an attachment or a blocker)
//! - is an external interface (an inventory, a tank) attached on this face?
//!
//! Two adjacent segments are linked only if both facing sides allow it.

use std::collections::HashSet;

use conduit_topology::{Direction, Position};

/// Adjacency and capability lookups supplied by the host.
pub trait World {
    /// Whether a link may leave `pos` through `direction`.
    fn can_connect(&self, pos: Position, direction: Direction) -> bool {
        let _ = (pos, direction);
        true
    }

    /// Whether an external interface is reachable from `pos` through `direction`.
    fn has_capability(&self, pos: Position, direction: Direction) -> bool {
        let _ = (pos, direction);
        false
    }

    /// Whether segments at `pos` and its neighbor across `direction` are linked.
    fn is_linked(&self, pos: Position, direction: Direction) -> bool {
        self.can_connect(pos, direction) && self.can_connect(pos.offset(direction), direction.opposite())
    }
}

/// A world where every face connects and nothing is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWorld;

impl World for OpenWorld {}

/// A world described by explicit sets of closed faces and attached interfaces.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    blocked: HashSet<(Position, Direction)>,
    attached: HashSet<(Position, Direction)>,
}

impl StaticWorld {
    /// Create a world with every face open and nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the face of `pos` toward `direction`.
    pub fn block(&mut self, pos: Position, direction: Direction) -> &mut Self {
        self.blocked.insert((pos, direction));
        self
    }

    /// Reopen a closed face.
    pub fn unblock(&mut self, pos: Position, direction: Direction) -> &mut Self {
        self.blocked.remove(&(pos, direction));
        self
    }

    /// Attach an external interface reachable from `pos` through `direction`.
    pub fn attach(&mut self, pos: Position, direction: Direction) -> &mut Self {
        self.attached.insert((pos, direction));
        self
    }

    /// Remove an attached interface.
    pub fn detach(&mut self, pos: Position, direction: Direction) -> &mut Self {
        self.attached.remove(&(pos, direction));
        self
    }
}

impl World for StaticWorld {
    fn can_connect(&self, pos: Position, direction: Direction) -> bool {
        !self.blocked.contains(&(pos, direction))
    }

    fn has_capability(&self, pos: Position, direction: Direction) -> bool {
        self.attached.contains(&(pos, direction))
    }
}
