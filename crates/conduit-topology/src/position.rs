//! Integer grid positions.
//!
//! A position is a cell of the world grid. Positions are ordered
//! lexicographically by (x, y, z) so collections of them iterate in a stable
//! order.

use std::ops::{Add, Neg, Sub};

use crate::Direction;

const HORIZONTAL_BITS: u32 = 26;
const VERTICAL_BITS: u32 = 12;
const X_SHIFT: u32 = VERTICAL_BITS + HORIZONTAL_BITS;
const Z_SHIFT: u32 = VERTICAL_BITS;
const HORIZONTAL_MASK: i64 = (1 << HORIZONTAL_BITS) - 1;
const VERTICAL_MASK: i64 = (1 << VERTICAL_BITS) - 1;

/// Largest |x| or |z| that survives key packing (the negative bound is one further).
pub const MAX_HORIZONTAL: i32 = (1 << (HORIZONTAL_BITS - 1)) - 1;

/// Largest |y| that survives key packing (the negative bound is one further).
pub const MAX_VERTICAL: i32 = (1 << (VERTICAL_BITS - 1)) - 1;

/// A cell of the 3D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// East-west axis
    pub x: i32,
    /// Vertical axis
    pub y: i32,
    /// North-south axis
    pub z: i32,
}

impl Position {
    /// Origin of the grid.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The adjacent cell across `direction`.
    #[inline]
    pub fn offset(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// All six adjacent cells, in direction index order.
    pub fn neighbors(self) -> [Self; 6] {
        Direction::ALL.map(|dir| self.offset(dir))
    }

    /// Number of face steps between two cells.
    pub fn manhattan(&self, other: &Self) -> u64 {
        u64::from((self.x - other.x).unsigned_abs())
            + u64::from((self.y - other.y).unsigned_abs())
            + u64::from((self.z - other.z).unsigned_abs())
    }

    /// Whether this position can be packed into a key without loss.
    pub const fn is_packable(&self) -> bool {
        self.x >= -MAX_HORIZONTAL - 1
            && self.x <= MAX_HORIZONTAL
            && self.z >= -MAX_HORIZONTAL - 1
            && self.z <= MAX_HORIZONTAL
            && self.y >= -MAX_VERTICAL - 1
            && self.y <= MAX_VERTICAL
    }

    /// Pack into a single key.
    ///
    /// Returns `None` for positions outside the packable range.
    pub const fn to_key(&self) -> Option<i64> {
        if !self.is_packable() {
            return None;
        }
        Some(
            ((self.x as i64 & HORIZONTAL_MASK) << X_SHIFT)
                | ((self.z as i64 & HORIZONTAL_MASK) << Z_SHIFT)
                | (self.y as i64 & VERTICAL_MASK),
        )
    }

    /// Unpack a key produced by [`Position::to_key`].
    ///
    /// Every `i64` decodes to some position; fields are sign-extended.
    pub const fn from_key(key: i64) -> Self {
        let x = key >> X_SHIFT;
        let z = (key << (64 - X_SHIFT)) >> (64 - HORIZONTAL_BITS);
        let y = (key << (64 - VERTICAL_BITS)) >> (64 - VERTICAL_BITS);
        Self {
            x: x as i32,
            y: y as i32,
            z: z as i32,
        }
    }
}

impl Add for Position {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Position {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Position {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}
