//! The direction table and the edge algebra built on it.
//!
//! `DIRECTIONS` is the single source of truth for which edge index of a tile
//! touches which neighbour: edge `i` of a tile at `h` touches the tile at
//! `h + DIRECTIONS[i]`. Indices run clockwise, and `i` and `i + 3` are always
//! antipodal.

use crate::hex::Hex;
use serde::{Deserialize, Serialize};

/// Unit offsets in edge-index order.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(0, -1),  // S
    Hex::new(-1, 0),  // SW
    Hex::new(-1, 1),  // NW
    Hex::new(0, 1),   // N
    Hex::new(1, 0),   // NE
    Hex::new(1, -1),  // SE
];

/// Direction of an edge relative to a hex.
///
/// Compass names assume the default flat-top layout with world `+z` as north.
/// Only the index order matters to the matching rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    South,
    SouthWest,
    NorthWest,
    North,
    NorthEast,
    SouthEast,
}

impl EdgeDirection {
    /// All edge directions in index order
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::South,
        EdgeDirection::SouthWest,
        EdgeDirection::NorthWest,
        EdgeDirection::North,
        EdgeDirection::NorthEast,
        EdgeDirection::SouthEast,
    ];

    /// Position in the direction table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for any integer index, wrapping with floor-modulo
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(6) as usize]
    }

    /// The unit hex offset for this direction
    pub fn offset(self) -> Hex {
        DIRECTIONS[self.index()]
    }

    /// The direction pointing the other way
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() as i32 + 3)
    }

    /// Rotate by `steps` sixths of a turn (positive is clockwise)
    pub fn rotated(self, steps: i32) -> Self {
        Self::from_index(self.index() as i32 + steps)
    }
}

/// Offset for any integer direction index, wrapping into `0..6`
pub fn direction(index: i32) -> Hex {
    DIRECTIONS[index.rem_euclid(6) as usize]
}

/// `hex + DIRECTIONS[index]`
pub fn neighbor(hex: Hex, index: usize) -> Hex {
    hex + DIRECTIONS[index % 6]
}

/// All six neighbours of `hex`, in direction-index order
pub fn neighbors(hex: Hex) -> [Hex; 6] {
    DIRECTIONS.map(|dir| hex + dir)
}

/// The index that is antipodal to `index`
pub const fn opposite_index(index: usize) -> usize {
    (index + 3) % 6
}

/// Index of the edge of `from` that faces `to`, if the two are unit-adjacent
pub fn try_shared_edge_index(from: Hex, to: Hex) -> Option<usize> {
    let delta = to - from;
    DIRECTIONS.iter().position(|dir| *dir == delta)
}

/// Index of the edge of `from` that faces `to`.
///
/// # Panics
///
/// Panics if the hexes are not neighbours. Callers must only pass true
/// neighbours; use [`try_shared_edge_index`] to probe adjacency.
pub fn shared_edge_index(from: Hex, to: Hex) -> usize {
    match try_shared_edge_index(from, to) {
        Some(index) => index,
        None => panic!("no shared edge between {from} and {to}: hexes are not adjacent"),
    }
}

/// Distance between two hexes in hex steps
pub fn distance(a: Hex, b: Hex) -> u32 {
    a.distance_to(&b)
}
