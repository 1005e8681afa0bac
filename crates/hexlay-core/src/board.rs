//! The board: which hexes hold which tiles, and whether a tile may go
//! somewhere.
//!
//! `HexGrid` is the only owner of the occupancy map. Collaborators read it
//! through the query methods and change it only through [`HexGrid::commit`],
//! which trusts the caller to have checked [`HexGrid::can_place`] first.

use crate::direction::{self, DIRECTIONS};
use crate::hex::{FractionalHex, Hex};
use crate::layout::{Layout, Point3};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// The game board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GridSnapshot", into = "GridSnapshot")]
pub struct HexGrid {
    /// Hex <-> world transform
    layout: Layout,
    /// Placed tiles indexed by position
    tiles: HashMap<Hex, Tile>,
}

/// Serialized form: JSON objects cannot use `Hex` keys
#[derive(Serialize, Deserialize)]
struct GridSnapshot {
    layout: Layout,
    tiles: Vec<(Hex, Tile)>,
}

impl From<GridSnapshot> for HexGrid {
    fn from(snapshot: GridSnapshot) -> Self {
        Self {
            layout: snapshot.layout,
            tiles: snapshot.tiles.into_iter().collect(),
        }
    }
}

impl From<HexGrid> for GridSnapshot {
    fn from(grid: HexGrid) -> Self {
        let mut tiles: Vec<(Hex, Tile)> = grid.tiles.into_iter().collect();
        tiles.sort_by_key(|(hex, _)| (hex.q, hex.r));
        Self {
            layout: grid.layout,
            tiles,
        }
    }
}

impl HexGrid {
    /// Create an empty board
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            tiles: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // ==================== Geometry ====================

    /// World position of a hex center
    pub fn hex_to_world(&self, hex: Hex) -> Point3 {
        self.layout.hex_to_world(hex)
    }

    /// World position of a fractional coordinate
    pub fn fractional_to_world(&self, hex: FractionalHex) -> Point3 {
        self.layout.fractional_to_world(hex)
    }

    /// The hex under a world position
    pub fn world_to_hex(&self, point: Point3) -> Hex {
        self.layout.world_to_hex(point)
    }

    /// World position of the midpoint of the edge of `hex` in `direction`
    pub fn edge_midpoint_world(&self, hex: Hex, direction: usize) -> Point3 {
        let offset = FractionalHex::from(DIRECTIONS[direction % 6]) * 0.5;
        self.fractional_to_world(FractionalHex::from(hex) + offset)
    }

    // ==================== Occupancy ====================

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    /// The tile at a position, if any
    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    /// Number of placed tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All occupied positions, in no particular order
    pub fn occupied_hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        self.tiles.keys().copied()
    }

    /// All placed tiles with their positions
    pub fn tiles(&self) -> impl Iterator<Item = (Hex, &Tile)> {
        self.tiles.iter().map(|(hex, tile)| (*hex, tile))
    }

    /// The six neighbours of `hex` in direction order, occupied or not
    pub fn neighbors(&self, hex: Hex) -> [Hex; 6] {
        direction::neighbors(hex)
    }

    /// The occupied neighbours of `hex`, in direction order
    pub fn occupied_neighbors(&self, hex: Hex) -> Vec<Hex> {
        self.neighbors(hex)
            .into_iter()
            .filter(|n| self.is_occupied(*n))
            .collect()
    }

    /// True if at least one neighbour is empty
    pub fn has_any_free_neighbor(&self, hex: Hex) -> bool {
        self.neighbors(hex).iter().any(|n| !self.is_occupied(*n))
    }

    /// Empty hexes next to at least one placed tile, sorted by `(q, r)`
    pub fn frontier(&self) -> Vec<Hex> {
        let open: HashSet<Hex> = self
            .tiles
            .keys()
            .flat_map(|hex| direction::neighbors(*hex))
            .filter(|n| !self.is_occupied(*n))
            .collect();
        let mut frontier: Vec<Hex> = open.into_iter().collect();
        frontier.sort_by_key(|h| (h.q, h.r));
        frontier
    }

    // ==================== Placement rules ====================

    /// Whether `tile` agrees with every placed neighbour of `hex`
    pub fn edges_match_all_neighbors(&self, hex: Hex, tile: &Tile) -> bool {
        for neighbor in self.occupied_neighbors(hex) {
            let Some(neighbor_tile) = self.tiles.get(&neighbor) else {
                continue;
            };
            let shared = direction::shared_edge_index(hex, neighbor);
            if !tile.matches(neighbor_tile, shared) {
                trace!(%hex, %neighbor, shared, "edge mismatch");
                return false;
            }
        }
        true
    }

    /// The single legality gate for placing `tile` at `hex`
    pub fn can_place(&self, hex: Hex, tile: &Tile) -> bool {
        if !hex.in_bounds() {
            trace!(%hex, "rejected: out of bounds");
            return false;
        }
        if self.is_occupied(hex) {
            trace!(%hex, "rejected: occupied");
            return false;
        }
        if !self.has_any_free_neighbor(hex) {
            trace!(%hex, "rejected: enclosed");
            return false;
        }
        self.edges_match_all_neighbors(hex, tile)
    }

    /// Put `tile` on the board at `hex` and freeze it.
    ///
    /// Does not check the placement rules; call [`HexGrid::can_place`] first.
    ///
    /// # Panics
    ///
    /// Panics if `hex` is already occupied or outside [`Hex::MAX_RADIUS`].
    pub fn commit(&mut self, hex: Hex, mut tile: Tile) {
        assert!(hex.in_bounds(), "commit outside the board at {hex}");
        assert!(
            !self.is_occupied(hex),
            "commit on occupied hex {hex}: placement must be checked first"
        );
        tile.mark_placed(hex);
        debug!(%hex, rotation = tile.rotation(), label = ?tile.label, "tile committed");
        self.tiles.insert(hex, tile);
    }

    /// Remove every tile, for a new game
    pub fn reset(&mut self) {
        debug!(tiles = self.tiles.len(), "board reset");
        self.tiles.clear();
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}
