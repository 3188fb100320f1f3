//! Conduit Grid Topology
//!
//! Segments of a conduit network occupy cells of a 3D integer grid. Each cell
//! touches exactly 6 others, one across each axis-aligned face.
//!
//! # Faces
//!
//! Directions are enumerated in a fixed order (down, up, north, south, west,
//! east). The order is part of the persisted format: directions are stored as
//! their index, and scans visit neighbors in this order so their results are
//! reproducible.
//!
//! # Position Keys
//!
//! A position packs into a single `i64` (26 bits x, 26 bits z, 12 bits y).
//! Saved layouts key segments and network origins by this value.

mod direction;
mod position;

pub use direction::Direction;
pub use position::{Position, MAX_HORIZONTAL, MAX_VERTICAL};

/// Number of faces (and therefore neighbors) of a grid cell.
pub const FACES_PER_CELL: usize = 6;

// Every direction must have a distinct slot in the face table
const _: () = assert!(Direction::ALL.len() == FACES_PER_CELL);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_invariant() {
        assert_eq!(Direction::ALL.len(), FACES_PER_CELL);
        assert_eq!(Position::ORIGIN.neighbors().len(), FACES_PER_CELL);
    }
}
