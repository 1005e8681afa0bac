//! Tiles and the edge-matching algebra.
//!
//! A tile has six authored edges and a rotation offset. Rotation never
//! rewrites the edge array: the edge that faces direction `d` is read as
//! `edges[(d + rotation) % 6]`.

use crate::direction::opposite_index;
use crate::game::GameError;
use crate::hex::Hex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What runs across an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EdgeType {
    /// Plain ground, never part of an area
    #[default]
    None,
    Street,
    Castle,
    Forest,
    River,
}

impl EdgeType {
    /// All edge types
    pub const ALL: [EdgeType; 5] = [
        EdgeType::None,
        EdgeType::Street,
        EdgeType::Castle,
        EdgeType::Forest,
        EdgeType::River,
    ];

    /// Whether this type can form an area that gets completed
    pub fn forms_area(&self) -> bool {
        !matches!(self, EdgeType::None)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeType::None => "None",
            EdgeType::Street => "Street",
            EdgeType::Castle => "Castle",
            EdgeType::Forest => "Forest",
            EdgeType::River => "River",
        };
        f.write_str(name)
    }
}

/// One side of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Groups edges of one tile that belong together. Carried for tile
    /// authoring; matching and area completion ignore it.
    #[serde(default)]
    pub region: i32,
}

impl Edge {
    pub const fn new(edge_type: EdgeType, region: i32) -> Self {
        Self { edge_type, region }
    }
}

impl From<EdgeType> for Edge {
    fn from(edge_type: EdgeType) -> Self {
        Self::new(edge_type, 0)
    }
}

/// Where a tile is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TileState {
    /// Drawn, on the tray or being previewed. May still rotate.
    #[default]
    Unplaced,
    /// Committed to the board. Rotation and position are frozen.
    Placed(Hex),
}

/// A placeable tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    edges: [Edge; 6],
    rotation: u8,
    #[serde(default)]
    state: TileState,
    /// Optional name of the template this tile was drawn from
    #[serde(default)]
    pub label: Option<String>,
}

impl Tile {
    /// Create an unplaced tile with rotation 0
    pub fn new(edges: [Edge; 6]) -> Self {
        Self {
            edges,
            rotation: 0,
            state: TileState::Unplaced,
            label: None,
        }
    }

    /// Create a tile from edge types only, all in region 0
    pub fn from_types(types: [EdgeType; 6]) -> Self {
        Self::new(types.map(Edge::from))
    }

    /// A tile whose six edges all have the same type
    pub fn uniform(edge_type: EdgeType) -> Self {
        Self::from_types([edge_type; 6])
    }

    /// Attach a template name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The authored edges, unaffected by rotation
    pub fn edges(&self) -> &[Edge; 6] {
        &self.edges
    }

    /// Current rotation in sixths of a turn, always in `0..6`
    pub fn rotation(&self) -> u8 {
        self.rotation % 6
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.state, TileState::Placed(_))
    }

    /// Board position once placed
    pub fn position(&self) -> Option<Hex> {
        match self.state {
            TileState::Placed(hex) => Some(hex),
            TileState::Unplaced => None,
        }
    }

    /// Rotate by `steps` sixths of a turn. Each positive step moves every
    /// edge one slot counter-clockwise; negative steps go the other way.
    ///
    /// Fails once the tile has been placed.
    pub fn rotate(&mut self, steps: i32) -> Result<(), GameError> {
        if self.is_placed() {
            return Err(GameError::TileAlreadyPlaced);
        }
        self.rotation = (self.rotation as i32 + steps.rem_euclid(6)).rem_euclid(6) as u8;
        Ok(())
    }

    /// Set an absolute rotation (taken modulo 6)
    pub fn set_rotation(&mut self, rotation: u8) -> Result<(), GameError> {
        if self.is_placed() {
            return Err(GameError::TileAlreadyPlaced);
        }
        self.rotation = rotation % 6;
        Ok(())
    }

    /// Index into `edges()` of the edge that currently faces `direction`
    pub fn edge_index_facing(&self, direction: usize) -> usize {
        (direction + self.rotation() as usize) % 6
    }

    /// The edge that currently faces `direction`
    pub fn edge_facing(&self, direction: usize) -> &Edge {
        &self.edges[self.edge_index_facing(direction)]
    }

    /// Edge types in direction order, with rotation applied
    pub fn facing_types(&self) -> [EdgeType; 6] {
        std::array::from_fn(|direction| self.edge_facing(direction).edge_type)
    }

    /// Whether any edge has the given type
    pub fn has_edge_type(&self, edge_type: EdgeType) -> bool {
        self.edges.iter().any(|e| e.edge_type == edge_type)
    }

    /// Whether this tile and `other` agree on the edge between them.
    ///
    /// `shared_edge_index` is the direction from this tile towards `other`.
    /// The other tile sees this tile through the antipodal direction.
    pub fn matches(&self, other: &Tile, shared_edge_index: usize) -> bool {
        let ours = self.edge_facing(shared_edge_index);
        let theirs = other.edge_facing(opposite_index(shared_edge_index));
        ours.edge_type == theirs.edge_type
    }

    pub(crate) fn mark_placed(&mut self, hex: Hex) {
        self.state = TileState::Placed(hex);
    }

    /// A copy that is back off the board, keeping edges and rotation
    pub(crate) fn unplaced(&self) -> Tile {
        Tile {
            state: TileState::Unplaced,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{neighbor, shared_edge_index};
    use proptest::prelude::*;

    fn edge_type_strategy() -> impl Strategy<Value = EdgeType> {
        prop::sample::select(EdgeType::ALL.to_vec())
    }

    fn tile_strategy() -> impl Strategy<Value = Tile> {
        (prop::array::uniform6(edge_type_strategy()), 0u8..6).prop_map(|(types, rotation)| {
            let mut tile = Tile::from_types(types);
            tile.set_rotation(rotation).unwrap();
            tile
        })
    }

    fn street_at(index: usize) -> Tile {
        let mut types = [EdgeType::None; 6];
        types[index] = EdgeType::Street;
        Tile::from_types(types)
    }

    #[test]
    fn test_rotation_reads_offset_edges() {
        let mut tile = street_at(2);
        assert_eq!(tile.edge_facing(2).edge_type, EdgeType::Street);

        tile.rotate(1).unwrap();
        assert_eq!(tile.rotation(), 1);
        assert_eq!(tile.edge_facing(1).edge_type, EdgeType::Street);
        assert_eq!(tile.edge_facing(2).edge_type, EdgeType::None);

        tile.rotate(-2).unwrap();
        assert_eq!(tile.rotation(), 5);
        assert_eq!(tile.edge_facing(3).edge_type, EdgeType::Street);
    }

    #[test]
    fn test_rotation_by_extreme_steps() {
        let mut tile = street_at(0);
        tile.rotate(i32::MAX).unwrap();
        assert_eq!(tile.rotation() as i32, i32::MAX.rem_euclid(6));
        assert_eq!(tile.rotation(), 1);

        tile.rotate(i32::MIN).unwrap();
        assert_eq!(tile.rotation(), 5);

        tile.rotate(i32::MAX).unwrap();
        tile.rotate(i32::MAX).unwrap();
        assert_eq!(tile.rotation(), 1);
    }

    #[test]
    fn test_rotation_never_rewrites_edges() {
        let mut tile = Tile::from_types([
            EdgeType::Street,
            EdgeType::Castle,
            EdgeType::Forest,
            EdgeType::River,
            EdgeType::None,
            EdgeType::Castle,
        ]);
        let authored = *tile.edges();
        let start = tile.facing_types();

        for step in 1..=6 {
            tile.rotate(1).unwrap();
            assert_eq!(tile.edges(), &authored);
            if step < 6 {
                assert_ne!(tile.facing_types(), start);
            }
        }
        assert_eq!(tile.rotation(), 0);
        assert_eq!(tile.facing_types(), start);
    }

    #[test]
    fn test_placed_tile_cannot_rotate() {
        let mut tile = street_at(0);
        tile.mark_placed(Hex::new(1, 0));
        assert!(matches!(tile.rotate(1), Err(GameError::TileAlreadyPlaced)));
        assert!(tile.set_rotation(3).is_err());
        assert_eq!(tile.rotation(), 0);
        assert_eq!(tile.position(), Some(Hex::new(1, 0)));
    }

    #[test]
    fn test_matches_facing_edges() {
        // A has a street towards direction 3, B has a street towards 0
        let a = street_at(3);
        let b = street_at(0);
        assert!(a.matches(&b, 3));
        assert!(b.matches(&a, 0));

        // Any other axis compares None with None
        assert!(a.matches(&b, 1));

        // Street against None
        let c = street_at(3);
        assert!(!a.matches(&c, 3));
        assert!(!c.matches(&a, 0));
    }

    #[test]
    fn test_matches_respects_both_rotations() {
        let mut a = street_at(0);
        let mut b = street_at(0);
        assert!(!a.matches(&b, 3));

        // Turn A so its street faces 3: (3 + rotation) % 6 == 0
        a.set_rotation(3).unwrap();
        assert!(a.matches(&b, 3));

        // Turning B moves its street away from direction 0
        b.rotate(1).unwrap();
        assert!(!a.matches(&b, 3));
        assert!(!b.matches(&a, 0));
    }

    #[test]
    fn test_edge_serde_uses_type_key() {
        let edge = Edge::new(EdgeType::River, 2);
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"type":"River","region":2}"#);
        let back: Edge = serde_json::from_str(r#"{"type":"Forest"}"#).unwrap();
        assert_eq!(back, Edge::new(EdgeType::Forest, 0));
    }

    #[test]
    fn test_region_does_not_affect_matching() {
        let a = Tile::new([Edge::new(EdgeType::Forest, 1); 6]);
        let b = Tile::new([Edge::new(EdgeType::Forest, 7); 6]);
        for i in 0..6 {
            assert!(a.matches(&b, i));
        }
    }

    proptest! {
        #[test]
        fn matching_is_symmetric(
            a in tile_strategy(),
            b in tile_strategy(),
            q in -50i32..50,
            r in -50i32..50,
            dir in 0usize..6,
        ) {
            let ha = Hex::new(q, r);
            let hb = neighbor(ha, dir);
            let forward = a.matches(&b, shared_edge_index(ha, hb));
            let backward = b.matches(&a, shared_edge_index(hb, ha));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn six_rotations_are_identity(mut tile in tile_strategy(), step in prop::sample::select(vec![-1i32, 1])) {
            let authored = *tile.edges();
            let facing = tile.facing_types();
            for _ in 0..6 {
                tile.rotate(step).unwrap();
                prop_assert_eq!(tile.edges(), &authored);
            }
            prop_assert_eq!(tile.facing_types(), facing);
        }
    }
}
