//! Placement coordinator.
//!
//! A `PlacementSession` owns the board and the score/reserve counters and
//! runs one placement end to end: legality, commit, adjacency score and
//! area completion. Everything it needs is handed in through the
//! constructor.

use crate::board::HexGrid;
use crate::config::ScoringConfig;
use crate::direction::shared_edge_index;
use crate::game::GameError;
use crate::hex::Hex;
use crate::layout::Point3;
use crate::region::RegionCompletion;
use crate::tile::{EdgeType, Tile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Score and tile reserve of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameState {
    pub score: u32,
    /// Tiles still available to draw
    pub tile_reserve: u32,
}

impl GameState {
    pub fn new(tile_reserve: u32) -> Self {
        Self {
            score: 0,
            tile_reserve,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Take one tile out of the reserve. Returns false if it was empty.
    pub fn take_from_reserve(&mut self) -> bool {
        if self.tile_reserve == 0 {
            return false;
        }
        self.tile_reserve -= 1;
        true
    }

    pub fn receive_tile_reward(&mut self, amount: u32) {
        self.tile_reserve = self.tile_reserve.saturating_add(amount);
    }

    pub fn has_tiles(&self) -> bool {
        self.tile_reserve > 0
    }
}

/// Receives a call for every area a placement completes
pub trait RewardHandler {
    fn on_area_completed(&mut self, edge_type: EdgeType, hex: Hex);
}

impl<F> RewardHandler for F
where
    F: FnMut(EdgeType, Hex),
{
    fn on_area_completed(&mut self, edge_type: EdgeType, hex: Hex) {
        self(edge_type, hex)
    }
}

/// Reward handler that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreRewards;

impl RewardHandler for IgnoreRewards {
    fn on_area_completed(&mut self, _edge_type: EdgeType, _hex: Hex) {}
}

/// One neighbour that earned points, with where to show them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredEdge {
    pub neighbor: Hex,
    /// Direction from the placed tile towards `neighbor`
    pub direction: usize,
    /// World position of the middle of the shared edge
    pub midpoint: Point3,
}

/// What a successful placement did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub hex: Hex,
    /// Adjacency points for this placement
    pub points: u32,
    pub scored_edges: Vec<ScoredEdge>,
    /// Edge types whose area this placement closed
    pub completed: Vec<EdgeType>,
    /// Tiles added to the reserve for the completed areas
    pub tiles_rewarded: u32,
}

/// What a placement would do, without doing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPreview {
    pub points: u32,
    pub completes: Vec<EdgeType>,
}

/// Coordinates placements on one board
#[derive(Debug, Clone)]
pub struct PlacementSession {
    grid: HexGrid,
    state: GameState,
    scoring: ScoringConfig,
}

impl PlacementSession {
    pub fn new(grid: HexGrid, state: GameState, scoring: ScoringConfig) -> Self {
        Self {
            grid,
            state,
            scoring,
        }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Place the first tile at the origin without the legality gate.
    ///
    /// Only allowed on an empty board.
    pub fn place_start_tile(&mut self, tile: Tile) -> Result<(), GameError> {
        if !self.grid.is_empty() {
            return Err(GameError::AlreadyStarted);
        }
        debug!(label = ?tile.label, "placing start tile");
        self.grid.commit(Hex::ORIGIN, tile);
        Ok(())
    }

    /// Whether `tile` may go at `hex`
    pub fn can_place(&self, hex: Hex, tile: &Tile) -> bool {
        self.grid.can_place(hex, tile)
    }

    /// Place a copy of `tile` at `hex`, ignoring area rewards beyond the
    /// reserve bookkeeping
    pub fn try_place(&mut self, hex: Hex, tile: &Tile) -> Result<PlacementOutcome, GameError> {
        self.try_place_with(hex, tile, &mut IgnoreRewards)
    }

    /// Place a copy of `tile` at `hex` and call `rewards` for every area
    /// the placement completes.
    ///
    /// On error nothing changes.
    pub fn try_place_with<H: RewardHandler>(
        &mut self,
        hex: Hex,
        tile: &Tile,
        rewards: &mut H,
    ) -> Result<PlacementOutcome, GameError> {
        if self.grid.is_empty() {
            return Err(GameError::NotStarted);
        }
        if tile.is_placed() {
            return Err(GameError::TileAlreadyPlaced);
        }
        if !hex.in_bounds() {
            debug!(%hex, "placement outside the board");
            return Err(GameError::OutOfBounds { hex });
        }
        if !self.grid.can_place(hex, tile) {
            debug!(%hex, rotation = tile.rotation(), "placement rejected");
            return Err(GameError::IllegalPlacement { hex });
        }

        self.grid.commit(hex, tile.clone());

        let scored_edges = self.scored_edges(hex);
        let points = scored_edges.len() as u32 * self.scoring.points_per_edge;
        self.state.add_score(points);

        let completed = self.completed_areas(hex);
        let tiles_rewarded = completed.len() as u32 * self.scoring.completion_tile_reward;
        for edge_type in &completed {
            info!(%hex, %edge_type, "area completed");
            self.state.receive_tile_reward(self.scoring.completion_tile_reward);
            rewards.on_area_completed(*edge_type, hex);
        }

        debug!(
            %hex,
            points,
            score = self.state.score,
            reserve = self.state.tile_reserve,
            "placement committed"
        );

        Ok(PlacementOutcome {
            hex,
            points,
            scored_edges,
            completed,
            tiles_rewarded,
        })
    }

    /// Score and completions `tile` would earn at `hex`, or `None` if the
    /// placement is illegal
    pub fn preview(&self, hex: Hex, tile: &Tile) -> Option<PlacementPreview> {
        if self.grid.is_empty() || !self.grid.can_place(hex, tile) {
            return None;
        }
        let mut scratch = PlacementSession::new(self.grid.clone(), self.state, self.scoring);
        scratch.grid.commit(hex, tile.clone());
        let points =
            scratch.grid.occupied_neighbors(hex).len() as u32 * self.scoring.points_per_edge;
        Some(PlacementPreview {
            points,
            completes: scratch.completed_areas(hex),
        })
    }

    /// Clear the board and counters for a new game
    pub fn reset(&mut self, state: GameState) {
        self.grid.reset();
        self.state = state;
    }

    /// Reset, then put `start_tile` at the origin
    pub fn restart_with(&mut self, state: GameState, start_tile: Tile) {
        self.reset(state);
        self.grid.commit(Hex::ORIGIN, start_tile);
    }

    fn scored_edges(&self, hex: Hex) -> Vec<ScoredEdge> {
        self.grid
            .occupied_neighbors(hex)
            .into_iter()
            .map(|neighbor| {
                let direction = shared_edge_index(hex, neighbor);
                ScoredEdge {
                    neighbor,
                    direction,
                    midpoint: self.grid.edge_midpoint_world(hex, direction),
                }
            })
            .collect()
    }

    /// Distinct area types facing a placed neighbour of `hex` whose area is
    /// now closed
    fn completed_areas(&self, hex: Hex) -> Vec<EdgeType> {
        let Some(tile) = self.grid.tile(hex) else {
            return Vec::new();
        };

        let mut touched: Vec<EdgeType> = Vec::new();
        for neighbor in self.grid.occupied_neighbors(hex) {
            let edge_type = tile.edge_facing(shared_edge_index(hex, neighbor)).edge_type;
            if edge_type.forms_area() && !touched.contains(&edge_type) {
                touched.push(edge_type);
            }
        }

        let search = RegionCompletion::new(&self.grid);
        touched
            .into_iter()
            .filter(|edge_type| search.check(hex, *edge_type))
            .collect()
    }
}
