//! Game loop.
//!
//! `Game` wraps a [`PlacementSession`] with the parts a player sees: a
//! tray of drawn tiles, a selected tile that can be rotated, and the
//! reserve that refills the tray. Everything goes through
//! [`Game::apply_action`], which returns the events it caused.

use crate::actions::{GameAction, GameEvent, Placement};
use crate::board::HexGrid;
use crate::catalog::TileCatalog;
use crate::config::{ConfigError, GameConfig};
use crate::hex::Hex;
use crate::session::{GameState, PlacementSession};
use crate::tile::{EdgeType, Tile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Tiles left to place
    Playing,
    /// Tray and reserve are empty. Only a restart is accepted.
    OutOfTiles { final_score: u32 },
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cannot place a tile at {hex}")]
    IllegalPlacement { hex: Hex },

    #[error("{hex} is outside the board")]
    OutOfBounds { hex: Hex },

    #[error("Board already has a start tile")]
    AlreadyStarted,

    #[error("Board has no start tile yet")]
    NotStarted,

    #[error("Tile is already on the board")]
    TileAlreadyPlaced,

    #[error("No tray slot {0}")]
    InvalidSlot(usize),

    #[error("Tray slot {0} is empty")]
    EmptySlot(usize),

    #[error("No tile selected")]
    NoTileSelected,

    #[error("Game is over")]
    GameOver,
}

/// Drawn tiles waiting to be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTray {
    slots: Vec<Option<Tile>>,
    selected: Option<usize>,
}

impl TileTray {
    /// An empty tray with `size` slots
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            selected: None,
        }
    }

    /// Number of slots, filled or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no slot holds a tile
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Option<Tile>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tile(&self) -> Option<&Tile> {
        self.selected.and_then(|slot| self.get(slot))
    }

    /// Slots without a tile, in order
    pub fn empty_slots(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|slot| self.slots[*slot].is_none())
            .collect()
    }

    /// Make `slot` the current tile. A previously selected tile goes back
    /// to the tray unrotated.
    pub fn select(&mut self, slot: usize) -> Result<(), GameError> {
        if slot >= self.slots.len() {
            return Err(GameError::InvalidSlot(slot));
        }
        if self.slots[slot].is_none() {
            return Err(GameError::EmptySlot(slot));
        }
        if let Some(previous) = self.selected.filter(|p| *p != slot) {
            if let Some(tile) = self.slots[previous].as_mut() {
                tile.set_rotation(0)?;
            }
        }
        self.selected = Some(slot);
        Ok(())
    }

    /// Rotate the selected tile, returning its slot and new rotation
    pub fn rotate_selected(&mut self, steps: i32) -> Result<(usize, u8), GameError> {
        let slot = self.selected.ok_or(GameError::NoTileSelected)?;
        let tile = self.slots[slot]
            .as_mut()
            .ok_or(GameError::EmptySlot(slot))?;
        tile.rotate(steps)?;
        Ok((slot, tile.rotation()))
    }

    /// Take the tile out of `slot`
    pub fn take(&mut self, slot: usize) -> Option<Tile> {
        if self.selected == Some(slot) {
            self.selected = None;
        }
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Put a tile into an empty slot
    pub fn put(&mut self, slot: usize, tile: Tile) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = Some(tile);
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.selected = None;
    }
}

/// Serializable view of a game, for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub tile_reserve: u32,
    pub tray: TileTray,
    pub board: HexGrid,
}

/// A single-player puzzle game
pub struct Game {
    session: PlacementSession,
    tray: TileTray,
    catalog: TileCatalog,
    config: GameConfig,
    phase: GamePhase,
    rng: StdRng,
    /// Set once `ReserveExhausted` went out, until the reserve grows again
    reserve_reported: bool,
}

impl Game {
    /// Create a game with the built-in tile set
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, TileCatalog::standard())
    }

    /// Create a game drawing from `catalog`
    pub fn with_catalog(config: GameConfig, catalog: TileCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = HexGrid::new(config.layout.to_layout());
        let session = PlacementSession::new(
            grid,
            GameState::new(config.starting_reserve),
            config.scoring,
        );

        let mut game = Self {
            session,
            tray: TileTray::new(config.tray_size),
            catalog,
            config,
            phase: GamePhase::Playing,
            rng,
            reserve_reported: false,
        };
        game.start();
        Ok(game)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::OutOfTiles { .. })
    }

    pub fn score(&self) -> u32 {
        self.session.state().score
    }

    pub fn tile_reserve(&self) -> u32 {
        self.session.state().tile_reserve
    }

    pub fn grid(&self) -> &HexGrid {
        self.session.grid()
    }

    pub fn session(&self) -> &PlacementSession {
        &self.session
    }

    pub fn tray(&self) -> &TileTray {
        &self.tray
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            score: self.score(),
            tile_reserve: self.tile_reserve(),
            tray: self.tray.clone(),
            board: self.grid().clone(),
        }
    }

    /// Every frontier hex and rotation where the tile in `slot` fits.
    ///
    /// Rotations that present the same edges as an earlier one are left
    /// out. An empty or missing slot has no placements.
    pub fn valid_placements(&self, slot: usize) -> Vec<Placement> {
        let Some(tile) = self.tray.get(slot) else {
            return Vec::new();
        };

        let mut placements = Vec::new();
        let mut candidate = tile.clone();
        let mut seen: Vec<[EdgeType; 6]> = Vec::with_capacity(6);
        for rotation in 0..6u8 {
            if candidate.set_rotation(rotation).is_err() {
                return Vec::new();
            }
            let facing = candidate.facing_types();
            if seen.contains(&facing) {
                continue;
            }
            seen.push(facing);

            for hex in self.grid().frontier() {
                if self.session.can_place(hex, &candidate) {
                    placements.push(Placement::new(hex, rotation));
                }
            }
        }
        placements
    }

    /// Apply an action to the game
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        if self.is_over() && action != GameAction::Restart {
            return Err(GameError::GameOver);
        }

        let mut events = Vec::new();

        match action {
            GameAction::SelectTile(slot) => {
                self.tray.select(slot)?;
                debug!(slot, "tile selected");
                events.push(GameEvent::TileSelected { slot });
            }

            GameAction::RotateSelected(steps) => {
                let (slot, rotation) = self.tray.rotate_selected(steps)?;
                events.push(GameEvent::TileRotated { slot, rotation });
            }

            GameAction::PlaceSelected(hex) => {
                events.extend(self.place_selected(hex)?);
            }

            GameAction::Restart => {
                events.extend(self.restart());
            }
        }

        Ok(events)
    }

    /// Clear the board, score, reserve and tray and start over
    pub fn restart(&mut self) -> Vec<GameEvent> {
        info!("game restarted");
        let mut events = vec![GameEvent::GameRestarted];
        events.extend(self.start());
        events
    }

    fn start(&mut self) -> Vec<GameEvent> {
        self.session.restart_with(
            GameState::new(self.config.starting_reserve),
            TileCatalog::start_tile(),
        );
        self.tray.clear();
        self.phase = GamePhase::Playing;
        self.reserve_reported = false;
        self.refill_tray()
    }

    fn place_selected(&mut self, hex: Hex) -> Result<Vec<GameEvent>, GameError> {
        let slot = self.tray.selected().ok_or(GameError::NoTileSelected)?;
        let tile = self
            .tray
            .get(slot)
            .cloned()
            .ok_or(GameError::EmptySlot(slot))?;

        let mut completions = Vec::new();
        let outcome = self.session.try_place_with(
            hex,
            &tile,
            &mut |edge_type: EdgeType, hex: Hex| {
                completions.push(GameEvent::AreaCompleted { edge_type, hex })
            },
        )?;
        self.tray.take(slot);

        let mut events = Vec::new();
        let placed = self.grid().tile(hex).cloned().unwrap_or(tile);
        events.push(GameEvent::TilePlaced {
            slot,
            hex,
            tile: placed,
        });

        if outcome.points > 0 {
            events.push(GameEvent::ScoreGained {
                points: outcome.points,
                total: self.score(),
                edges: outcome.scored_edges,
            });
        }

        events.extend(completions);
        if outcome.tiles_rewarded > 0 {
            self.reserve_reported = false;
            events.push(GameEvent::TilesRewarded {
                amount: outcome.tiles_rewarded,
                reserve: self.tile_reserve(),
            });
        }

        events.extend(self.refill_tray());

        if self.tray.is_empty() {
            let final_score = self.score();
            info!(final_score, "out of tiles");
            self.phase = GamePhase::OutOfTiles { final_score };
            events.push(GameEvent::OutOfTiles { final_score });
        }

        Ok(events)
    }

    /// Fill every empty slot while the reserve lasts
    fn refill_tray(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for slot in self.tray.empty_slots() {
            if !self.session.state_mut().take_from_reserve() {
                if !self.reserve_reported {
                    self.reserve_reported = true;
                    events.push(GameEvent::ReserveExhausted);
                }
                break;
            }
            let Some(tile) = self.catalog.draw(&mut self.rng) else {
                self.session.state_mut().receive_tile_reward(1);
                break;
            };
            debug!(slot, label = ?tile.label, "tile drawn");
            self.tray.put(slot, tile.clone());
            events.push(GameEvent::TileDrawn { slot, tile });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Edge;
    use pretty_assertions::assert_eq;

    fn blank_catalog() -> TileCatalog {
        // Blank tiles fit anywhere on the frontier
        TileCatalog::new(vec![Tile::uniform(EdgeType::None).with_label("blank")])
    }

    fn config(reserve: u32, tray: usize) -> GameConfig {
        GameConfig {
            starting_reserve: reserve,
            tray_size: tray,
            ..GameConfig::default()
        }
        .with_seed(11)
    }

    #[test]
    fn test_new_game_has_start_tile_and_full_tray() {
        let game = Game::new(GameConfig::default().with_seed(1)).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.grid().len(), 1);
        let start = game.grid().tile(Hex::ORIGIN).unwrap();
        assert!(start.edges().iter().all(|e| *e == Edge::from(EdgeType::None)));
        assert!(game.tray().slots().iter().all(Option::is_some));
        assert_eq!(game.tile_reserve(), 7);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = GameConfig {
            tray_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(Game::new(bad), Err(ConfigError::EmptyTray)));
        assert!(matches!(
            Game::with_catalog(GameConfig::default(), TileCatalog::new(Vec::new())),
            Err(ConfigError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_small_reserve_leaves_slots_empty() {
        let game = Game::with_catalog(config(2, 3), blank_catalog()).unwrap();
        assert_eq!(game.tray().empty_slots(), vec![2]);
        assert_eq!(game.tile_reserve(), 0);
    }

    #[test]
    fn test_select_and_rotate() {
        let mut game = Game::new(config(10, 3)).unwrap();

        assert_eq!(
            game.apply_action(GameAction::RotateSelected(1)),
            Err(GameError::NoTileSelected)
        );
        assert_eq!(
            game.apply_action(GameAction::SelectTile(9)),
            Err(GameError::InvalidSlot(9))
        );

        let events = game.apply_action(GameAction::SelectTile(0)).unwrap();
        assert_eq!(events, vec![GameEvent::TileSelected { slot: 0 }]);

        let events = game.apply_action(GameAction::RotateSelected(-1)).unwrap();
        assert_eq!(events, vec![GameEvent::TileRotated { slot: 0, rotation: 5 }]);
        assert_eq!(game.tray().selected_tile().unwrap().rotation(), 5);

        // Picking another tile puts the first one back unrotated
        game.apply_action(GameAction::SelectTile(1)).unwrap();
        assert_eq!(game.tray().get(0).unwrap().rotation(), 0);
        assert_eq!(game.tray().selected(), Some(1));
    }

    #[test]
    fn test_place_scores_and_refills() {
        let mut game = Game::with_catalog(config(10, 2), blank_catalog()).unwrap();
        assert_eq!(game.tile_reserve(), 8);

        game.apply_action(GameAction::SelectTile(1)).unwrap();
        let events = game
            .apply_action(GameAction::PlaceSelected(Hex::new(1, 0)))
            .unwrap();

        assert!(matches!(
            events[0],
            GameEvent::TilePlaced { slot: 1, hex, .. } if hex == Hex::new(1, 0)
        ));
        assert!(matches!(
            events[1],
            GameEvent::ScoreGained { points: 100, total: 100, .. }
        ));
        assert!(matches!(events[2], GameEvent::TileDrawn { slot: 1, .. }));
        assert_eq!(game.tile_reserve(), 7);
        assert_eq!(game.tray().selected(), None);
    }

    #[test]
    fn test_place_without_selection() {
        let mut game = Game::new(config(10, 3)).unwrap();
        assert_eq!(
            game.apply_action(GameAction::PlaceSelected(Hex::new(1, 0))),
            Err(GameError::NoTileSelected)
        );
    }

    #[test]
    fn test_illegal_place_keeps_tile_in_tray() {
        let catalog = TileCatalog::new(vec![Tile::uniform(EdgeType::Castle)]);
        let mut game = Game::with_catalog(config(10, 1), catalog).unwrap();
        game.apply_action(GameAction::SelectTile(0)).unwrap();

        // The blank start tile has no castle edges to meet
        assert_eq!(
            game.apply_action(GameAction::PlaceSelected(Hex::new(0, 1))),
            Err(GameError::IllegalPlacement {
                hex: Hex::new(0, 1)
            })
        );
        assert!(game.tray().get(0).is_some());
        assert_eq!(game.tray().selected(), Some(0));
        assert!(game.valid_placements(0).is_empty());
    }

    #[test]
    fn test_catalog_tiles_authored_as_placed_still_play() {
        let mut placed = Tile::uniform(EdgeType::None).with_label("blank");
        placed.mark_placed(Hex::new(2, 2));
        let catalog = TileCatalog::new(vec![placed]);
        let mut game = Game::with_catalog(config(10, 1), catalog).unwrap();

        game.apply_action(GameAction::SelectTile(0)).unwrap();
        game.apply_action(GameAction::RotateSelected(1)).unwrap();
        let events = game
            .apply_action(GameAction::PlaceSelected(Hex::new(0, 1)))
            .unwrap();
        assert!(matches!(events[0], GameEvent::TilePlaced { .. }));
        assert_eq!(game.grid().tile(Hex::new(0, 1)).unwrap().position(), Some(Hex::new(0, 1)));
    }

    #[test]
    fn test_place_far_from_origin_is_an_error() {
        let mut game = Game::with_catalog(config(10, 1), blank_catalog()).unwrap();
        game.apply_action(GameAction::SelectTile(0)).unwrap();

        for hex in [
            Hex::new(i32::MAX, 0),
            Hex::new(i32::MIN, i32::MIN),
            Hex::new(0, Hex::MAX_RADIUS as i32 + 1),
        ] {
            assert_eq!(
                game.apply_action(GameAction::PlaceSelected(hex)),
                Err(GameError::OutOfBounds { hex })
            );
        }
        assert_eq!(game.grid().len(), 1);
        assert_eq!(game.tray().selected(), Some(0));
    }

    #[test]
    fn test_runs_out_of_tiles() {
        let mut game = Game::with_catalog(config(2, 2), blank_catalog()).unwrap();

        game.apply_action(GameAction::SelectTile(0)).unwrap();
        let events = game
            .apply_action(GameAction::PlaceSelected(Hex::new(1, 0)))
            .unwrap();
        assert!(events.contains(&GameEvent::ReserveExhausted));
        assert!(!game.is_over());

        game.apply_action(GameAction::SelectTile(1)).unwrap();
        let events = game
            .apply_action(GameAction::PlaceSelected(Hex::new(-1, 0)))
            .unwrap();
        assert!(!events.contains(&GameEvent::ReserveExhausted));
        assert_eq!(
            events.last(),
            Some(&GameEvent::OutOfTiles { final_score: 200 })
        );
        assert_eq!(game.phase(), GamePhase::OutOfTiles { final_score: 200 });

        assert_eq!(
            game.apply_action(GameAction::SelectTile(0)),
            Err(GameError::GameOver)
        );

        let events = game.apply_action(GameAction::Restart).unwrap();
        assert_eq!(events[0], GameEvent::GameRestarted);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.grid().len(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.tile_reserve(), 0);
        assert!(game.tray().slots().iter().all(Option::is_some));

        // A new game reports the empty reserve again
        game.apply_action(GameAction::SelectTile(0)).unwrap();
        let events = game
            .apply_action(GameAction::PlaceSelected(Hex::new(1, 0)))
            .unwrap();
        assert!(events.contains(&GameEvent::ReserveExhausted));
    }

    #[test]
    fn test_valid_placements_skip_symmetric_rotations() {
        let game = Game::with_catalog(config(10, 1), blank_catalog()).unwrap();
        let placements = game.valid_placements(0);
        // Uniform tile: one rotation, six frontier hexes
        assert_eq!(placements.len(), 6);
        assert!(placements.iter().all(|p| p.rotation == 0));
        assert!(game.valid_placements(5).is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = Game::new(config(10, 3)).unwrap();
        let json = serde_json::to_string(&game.snapshot()).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tray, *game.tray());
        assert_eq!(back.board.len(), 1);
        assert_eq!(back.phase, GamePhase::Playing);
    }
}
