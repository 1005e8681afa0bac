//! Player actions and the events they produce.

use crate::hex::Hex;
use crate::session::ScoredEdge;
use crate::tile::{EdgeType, Tile};
use serde::{Deserialize, Serialize};

/// Everything a player can do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Pick up the tile in a tray slot
    SelectTile(usize),
    /// Rotate the selected tile by sixths of a turn
    RotateSelected(i32),
    /// Put the selected tile on the board
    PlaceSelected(Hex),
    /// Start over with a fresh board
    Restart,
}

/// A legal spot for a tile: where, and at which rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub hex: Hex,
    pub rotation: u8,
}

impl Placement {
    pub fn new(hex: Hex, rotation: u8) -> Self {
        Self { hex, rotation }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TileSelected {
        slot: usize,
    },

    TileRotated {
        slot: usize,
        rotation: u8,
    },

    /// A tile left the tray and is now on the board
    TilePlaced {
        slot: usize,
        hex: Hex,
        tile: Tile,
    },

    /// Adjacency points, one scored edge per placed neighbour
    ScoreGained {
        points: u32,
        total: u32,
        edges: Vec<ScoredEdge>,
    },

    /// An area of `edge_type` was closed by the tile at `hex`
    AreaCompleted {
        edge_type: EdgeType,
        hex: Hex,
    },

    /// Tiles added to the reserve
    TilesRewarded {
        amount: u32,
        reserve: u32,
    },

    /// A tray slot was filled from the reserve
    TileDrawn {
        slot: usize,
        tile: Tile,
    },

    /// A tray slot could not be filled. Sent once each time the reserve
    /// runs dry.
    ReserveExhausted,

    /// Nothing left to place
    OutOfTiles {
        final_score: u32,
    },

    GameRestarted,
}
