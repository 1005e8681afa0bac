//! Hex-to-world transform.
//!
//! The board lies in the world XZ plane. An `Orientation` holds the forward
//! matrix (hex -> world) and its inverse (world -> fractional hex); a
//! `Layout` adds the cell size and the world origin of hex `(0, 0, 0)`.

use crate::hex::{FractionalHex, Hex};
use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A point in world space. `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ZERO: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Which way the hexagons point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrientationKind {
    /// Flat top and bottom edges
    #[default]
    Flat,
    /// A corner at the top
    Pointy,
}

/// Forward and inverse 2x2 matrices for one hexagon orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    /// Angle of the first corner, in multiples of 60°
    pub start_angle: f64,
}

impl Orientation {
    pub const FLAT: Orientation = Orientation {
        f0: 3.0 / 2.0,
        f1: 0.0,
        f2: SQRT_3 / 2.0,
        f3: SQRT_3,
        b0: 2.0 / 3.0,
        b1: 0.0,
        b2: -1.0 / 3.0,
        b3: SQRT_3 / 3.0,
        start_angle: 0.0,
    };

    pub const POINTY: Orientation = Orientation {
        f0: SQRT_3,
        f1: SQRT_3 / 2.0,
        f2: 0.0,
        f3: 3.0 / 2.0,
        b0: SQRT_3 / 3.0,
        b1: -1.0 / 3.0,
        b2: 0.0,
        b3: 2.0 / 3.0,
        start_angle: 0.5,
    };

    pub fn from_kind(kind: OrientationKind) -> Self {
        match kind {
            OrientationKind::Flat => Self::FLAT,
            OrientationKind::Pointy => Self::POINTY,
        }
    }
}

/// Orientation, cell size and origin of the board in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub orientation: Orientation,
    /// Distance from a hex center to any of its corners
    pub size: f64,
    /// World position of the center of hex (0, 0, 0)
    pub origin: Point3,
}

impl Layout {
    pub fn new(kind: OrientationKind, size: f64, origin: Point3) -> Self {
        Self {
            orientation: Orientation::from_kind(kind),
            size,
            origin,
        }
    }

    /// World position of a hex center
    pub fn hex_to_world(&self, hex: Hex) -> Point3 {
        self.fractional_to_world(FractionalHex::from(hex))
    }

    /// World position of a fractional hex coordinate
    pub fn fractional_to_world(&self, hex: FractionalHex) -> Point3 {
        let m = &self.orientation;
        let x = (m.f0 * hex.q + m.f1 * hex.r) * self.size;
        let z = (m.f2 * hex.q + m.f3 * hex.r) * self.size;
        Point3::new(self.origin.x + x, self.origin.y, self.origin.z + z)
    }

    /// Fractional hex coordinate under a world position (height is ignored)
    pub fn world_to_fractional(&self, point: Point3) -> FractionalHex {
        let m = &self.orientation;
        let px = (point.x - self.origin.x) / self.size;
        let pz = (point.z - self.origin.z) / self.size;
        let q = m.b0 * px + m.b1 * pz;
        let r = m.b2 * px + m.b3 * pz;
        FractionalHex::new(q, r)
    }

    /// The hex whose cell contains a world position
    pub fn world_to_hex(&self, point: Point3) -> Hex {
        Hex::round(self.world_to_fractional(point))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(OrientationKind::Flat, 1.0, Point3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn assert_inverse(orientation: &Orientation) {
        // F * B should be the identity
        let a = orientation.f0 * orientation.b0 + orientation.f1 * orientation.b2;
        let b = orientation.f0 * orientation.b1 + orientation.f1 * orientation.b3;
        let c = orientation.f2 * orientation.b0 + orientation.f3 * orientation.b2;
        let d = orientation.f2 * orientation.b1 + orientation.f3 * orientation.b3;
        assert!((a - 1.0).abs() < EPSILON);
        assert!(b.abs() < EPSILON);
        assert!(c.abs() < EPSILON);
        assert!((d - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_matrices_are_inverse() {
        assert_inverse(&Orientation::FLAT);
        assert_inverse(&Orientation::POINTY);
    }

    #[test]
    fn test_origin_maps_to_layout_origin() {
        let layout = Layout::new(OrientationKind::Flat, 2.0, Point3::new(5.0, 1.0, -3.0));
        assert_eq!(layout.hex_to_world(Hex::ORIGIN), Point3::new(5.0, 1.0, -3.0));
    }

    #[test]
    fn test_neighbour_centres_are_equidistant() {
        let layout = Layout::new(OrientationKind::Flat, 1.5, Point3::ZERO);
        let center = layout.hex_to_world(Hex::ORIGIN);
        for n in Hex::ORIGIN.neighbors() {
            let d = center.distance(&layout.hex_to_world(n));
            assert!((d - 1.5 * SQRT_3).abs() < EPSILON, "distance was {d}");
        }
    }

    #[test]
    fn test_point_inside_cell_snaps_to_cell() {
        let layout = Layout::default();
        let hex = Hex::new(2, -1);
        let mut p = layout.hex_to_world(hex);
        p.x += 0.3;
        p.z -= 0.2;
        p.y = 10.0;
        assert_eq!(layout.world_to_hex(p), hex);
    }

    proptest! {
        #[test]
        fn world_round_trip(
            q in -200i32..200,
            r in -200i32..200,
            size in 0.1f64..10.0,
            pointy in any::<bool>(),
        ) {
            let kind = if pointy { OrientationKind::Pointy } else { OrientationKind::Flat };
            let layout = Layout::new(kind, size, Point3::new(3.0, 0.0, -7.0));
            let hex = Hex::new(q, r);
            prop_assert_eq!(layout.world_to_hex(layout.hex_to_world(hex)), hex);
        }
    }
}
