//! Hexlay - a hex-tile placement puzzle engine
//!
//! This crate provides the core logic of the puzzle:
//! - Axial/cube hex coordinates and the direction table
//! - Hex <-> world transform for flat and pointy layouts
//! - Tiles with six typed edges and read-time rotation
//! - The board, its placement rule, and area completion
//! - A placement coordinator with scoring and tile rewards
//! - A game loop with a tile tray, a reserve, and bots
//!
//! # Architecture
//!
//! The engine is platform-agnostic. It can be compiled to:
//! - Native Rust for server-side hosting
//! - WebAssembly for an in-browser client
//!
//! # Modules
//!
//! - [`hex`], [`direction`], [`layout`]: coordinates and geometry
//! - [`tile`], [`catalog`]: tiles and the templates they are drawn from
//! - [`board`], [`region`]: occupancy, legality and area completion
//! - [`session`]: one placement end to end
//! - [`game`], [`actions`], [`bot`]: the playable game

pub mod actions;
pub mod board;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod direction;
pub mod game;
pub mod hex;
pub mod layout;
pub mod region;
pub mod session;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent, Placement};
pub use board::HexGrid;
pub use bot::{Bot, BotDifficulty, BotMove};
pub use catalog::TileCatalog;
pub use config::{ConfigError, GameConfig, LayoutConfig, ScoringConfig};
pub use direction::{shared_edge_index, try_shared_edge_index, EdgeDirection, DIRECTIONS};
pub use game::{Game, GameError, GamePhase, GameSnapshot, TileTray};
pub use hex::{FractionalHex, Hex};
pub use layout::{Layout, Orientation, OrientationKind, Point3};
pub use region::{AreaStatus, RegionCompletion};
pub use session::{
    GameState, IgnoreRewards, PlacementOutcome, PlacementPreview, PlacementSession,
    RewardHandler, ScoredEdge,
};
pub use tile::{Edge, EdgeType, Tile, TileState};
