//! The six axis-aligned face directions.

use crate::Position;

/// A face of a grid cell.
///
/// The discriminants are the persisted index of each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// -y
    Down = 0,
    /// +y
    Up = 1,
    /// -z
    North = 2,
    /// +z
    South = 3,
    /// -x
    West = 4,
    /// +x
    East = 5,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// Persisted index of this direction.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Direction for a persisted index.
    ///
    /// Saved data is not trusted: anything out of range maps to `North`.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::North,
            3 => Self::South,
            4 => Self::West,
            5 => Self::East,
            _ => Self::North,
        }
    }

    /// The face on the other side of the cell.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Unit step across this face.
    pub const fn offset(self) -> Position {
        match self {
            Self::Down => Position::new(0, -1, 0),
            Self::Up => Position::new(0, 1, 0),
            Self::North => Position::new(0, 0, -1),
            Self::South => Position::new(0, 0, 1),
            Self::West => Position::new(-1, 0, 0),
            Self::East => Position::new(1, 0, 0),
        }
    }

    /// Direction of the unit step from `from` to `to`, if they are adjacent.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let diff = to - from;
        Self::ALL.into_iter().find(|dir| dir.offset() == diff)
    }

    /// Lowercase name, as used in scripts and logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        }
    }

    /// Parse a lowercase direction name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.name() == name)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index() as usize, i);
            assert_eq!(Direction::from_index(i as u8), *dir);
        }
    }

    #[test]
    fn out_of_range_index_falls_back_to_north() {
        assert_eq!(Direction::from_index(6), Direction::North);
        assert_eq!(Direction::from_index(255), Direction::North);
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), Position::ORIGIN);
        }
    }

    #[test]
    fn offsets_are_unique_unit_steps() {
        let offsets = Direction::ALL.map(Direction::offset);
        for i in 0..offsets.len() {
            assert_eq!(offsets[i].manhattan(&Position::ORIGIN), 1);
            for j in (i + 1)..offsets.len() {
                assert_ne!(offsets[i], offsets[j], "Duplicate offset at {} and {}", i, j);
            }
        }
    }

    #[test]
    fn between_adjacent_and_distant() {
        let a = Position::new(3, 4, 5);
        assert_eq!(Direction::between(a, a + Position::new(1, 0, 0)), Some(Direction::East));
        assert_eq!(Direction::between(a, a + Position::new(0, -1, 0)), Some(Direction::Down));
        assert_eq!(Direction::between(a, a + Position::new(2, 0, 0)), None);
        assert_eq!(Direction::between(a, a), None);
    }

    #[test]
    fn names_parse_back() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_name(dir.name()), Some(dir));
        }
        assert_eq!(Direction::from_name("sideways"), None);
    }
}
