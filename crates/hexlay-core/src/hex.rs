//! Hex coordinate system using cube coordinates stored in axial form.
//!
//! This module provides the foundational coordinate types for the board:
//! - `Hex`: Identifies an individual cell
//! - `FractionalHex`: Real-valued positions between cells (edge midpoints,
//!   pointer hits before snapping)
//!
//! Only `q` and `r` are stored. The third cube coordinate is derived as
//! `s = -q - r`, so the invariant `q + r + s == 0` holds for every value that
//! can be constructed.

use crate::direction::{self, EdgeDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Cube coordinate for the hex grid.
///
/// - `q` is the column axis
/// - `r` is the row axis
/// - `s` (not stored) satisfies: q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    /// The origin cell, where the start tile goes
    pub const ORIGIN: Hex = Hex::new(0, 0);

    /// Furthest a playable cell may be from the origin
    pub const MAX_RADIUS: u32 = 1 << 20;

    /// Create a new hex from axial coordinates
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Create a hex from all three cube coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `q + r + s != 0`.
    pub fn cube(q: i32, r: i32, s: i32) -> Self {
        assert!(
            q + r + s == 0,
            "cube coordinates must sum to zero, got ({q}, {r}, {s})"
        );
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r).
    ///
    /// Saturates for cells outside [`Hex::in_bounds`].
    pub const fn s(&self) -> i32 {
        self.q.saturating_add(self.r).saturating_neg()
    }

    /// Distance from the origin in hex steps, saturating at `u32::MAX`
    pub fn length(&self) -> u32 {
        u32::try_from(self.wide_length()).unwrap_or(u32::MAX)
    }

    /// True if the cell is within [`Hex::MAX_RADIUS`] of the origin.
    ///
    /// Neighbours of an in-bounds cell never overflow `i32`.
    pub fn in_bounds(&self) -> bool {
        self.wide_length() <= i64::from(Self::MAX_RADIUS)
    }

    fn wide_length(&self) -> i64 {
        let q = i64::from(self.q);
        let r = i64::from(self.r);
        (q.abs() + r.abs() + (q + r).abs()) / 2
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &Hex) -> u32 {
        (*self - *other).length()
    }

    /// Get the neighbour in a specific direction
    pub fn neighbor(&self, direction: EdgeDirection) -> Hex {
        *self + direction.offset()
    }

    /// The six neighbouring hexes in direction-index order
    pub fn neighbors(&self) -> [Hex; 6] {
        direction::neighbors(*self)
    }

    /// Round fractional coordinates to the nearest hex.
    ///
    /// All three components are rounded independently, then the one with the
    /// largest rounding error is recomputed from the other two.
    pub fn round(frac: FractionalHex) -> Self {
        let mut rq = frac.q.round();
        let mut rr = frac.r.round();
        let rs = frac.s.round();

        let q_diff = (rq - frac.q).abs();
        let r_diff = (rr - frac.r).abs();
        let s_diff = (rs - frac.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = -(i64::from(self.q) + i64::from(self.r));
        write!(f, "({}, {}, {})", self.q, self.r, s)
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, rhs: Hex) -> Hex {
        Hex::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Mul<i32> for Hex {
    type Output = Hex;

    fn mul(self, k: i32) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }
}

impl Neg for Hex {
    type Output = Hex;

    fn neg(self) -> Hex {
        Hex::new(-self.q, -self.r)
    }
}

/// A real-valued cube coordinate.
///
/// Unlike `Hex`, all three components are stored, since callers may build
/// one from independent measurements. Constructors from axial values keep
/// the sum at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalHex {
    /// Create from axial coordinates, deriving `s`
    pub fn new(q: f64, r: f64) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Snap to the nearest cell
    pub fn round(self) -> Hex {
        Hex::round(self)
    }

    /// Linear interpolation towards `other`
    pub fn lerp(self, other: FractionalHex, t: f64) -> Self {
        Self {
            q: self.q + (other.q - self.q) * t,
            r: self.r + (other.r - self.r) * t,
            s: self.s + (other.s - self.s) * t,
        }
    }
}

impl From<Hex> for FractionalHex {
    fn from(hex: Hex) -> Self {
        Self {
            q: hex.q as f64,
            r: hex.r as f64,
            s: -(hex.q as f64) - hex.r as f64,
        }
    }
}

impl Add for FractionalHex {
    type Output = FractionalHex;

    fn add(self, rhs: FractionalHex) -> FractionalHex {
        FractionalHex {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl Mul<f64> for FractionalHex {
    type Output = FractionalHex;

    fn mul(self, k: f64) -> FractionalHex {
        FractionalHex {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_arithmetic() {
        let a = Hex::new(1, -2);
        let b = Hex::new(-3, 1);

        assert_eq!(a + b, Hex::new(-2, -1));
        assert_eq!(a - b, Hex::new(4, -3));
        assert_eq!(a * 3, Hex::new(3, -6));
        assert_eq!(-a, Hex::new(-1, 2));
        assert_eq!((a * 3).s(), 3);
    }

    #[test]
    fn test_hex_equality_and_hash() {
        let mut set = HashSet::new();
        set.insert(Hex::cube(1, -1, 0));
        set.insert(Hex::new(1, -1));
        set.insert(Hex::new(-1, 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    #[should_panic(expected = "must sum to zero")]
    fn test_cube_rejects_invalid_sum() {
        let _ = Hex::cube(1, 1, 1);
    }

    #[test]
    fn test_hex_distance() {
        let a = Hex::ORIGIN;
        let b = Hex::new(2, -1);
        assert_eq!(a.distance_to(&b), 2);

        let c = Hex::new(-3, 3);
        assert_eq!(a.distance_to(&c), 3);
        assert_eq!(c.length(), 3);
    }

    #[test]
    fn test_round_exact_values() {
        assert_eq!(FractionalHex::new(2.0, -1.0).round(), Hex::new(2, -1));
        assert_eq!(FractionalHex::from(Hex::new(-4, 7)).round(), Hex::new(-4, 7));
    }

    #[test]
    fn test_round_corrects_largest_error() {
        // q rounds to 0 with error 0.4, r rounds to 0 with 0.3, s rounds to
        // -1 with error 0.3 -> q is recomputed from r and s.
        let frac = FractionalHex {
            q: 0.4,
            r: 0.3,
            s: -0.7,
        };
        let hex = frac.round();
        assert_eq!(hex.q + hex.r + hex.s(), 0);
        assert_eq!(hex, Hex::new(1, 0));
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = FractionalHex::from(Hex::ORIGIN);
        let b = FractionalHex::from(Hex::new(4, -2));
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.round(), Hex::new(2, -1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Hex::new(2, -3).to_string(), "(2, -3, 1)");
        assert_eq!(
            Hex::new(i32::MAX, 1).to_string(),
            "(2147483647, 1, -2147483648)"
        );
    }

    #[test]
    fn test_extreme_cells_are_out_of_bounds() {
        let far = Hex::new(i32::MAX, 0);
        assert!(!far.in_bounds());
        assert_eq!(far.length(), i32::MAX as u32);
        assert_eq!(Hex::new(i32::MIN, i32::MIN).length(), u32::MAX);
        assert_eq!(Hex::new(i32::MIN, i32::MIN).s(), i32::MAX);

        let edge = Hex::new(Hex::MAX_RADIUS as i32, 0);
        assert!(edge.in_bounds());
        assert!(!(edge + Hex::new(1, 0)).in_bounds());
        assert!(Hex::ORIGIN.in_bounds());
    }

    proptest! {
        #[test]
        fn cube_invariant_holds(q in -500i32..500, r in -500i32..500, k in -5i32..5) {
            let h = Hex::new(q, r);
            prop_assert_eq!(h.q + h.r + h.s(), 0);
            let scaled = h * k;
            prop_assert_eq!(scaled.q + scaled.r + scaled.s(), 0);
            let sum = h + Hex::new(r, q);
            prop_assert_eq!(sum.q + sum.r + sum.s(), 0);
        }

        #[test]
        fn rounding_always_restores_invariant(q in -100.0f64..100.0, r in -100.0f64..100.0) {
            let hex = FractionalHex::new(q, r).round();
            prop_assert_eq!(hex.q + hex.r + hex.s(), 0);
            prop_assert!((hex.q as f64 - q).abs() <= 1.0);
            prop_assert!((hex.r as f64 - r).abs() <= 1.0);
        }
    }
}
