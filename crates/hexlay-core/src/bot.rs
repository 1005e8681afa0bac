//! Automatic players.
//!
//! - Easy: a random legal placement
//! - Greedy: the placement with the most adjacency points, then the most
//!   completed areas
//!
//! The same search backs placement hints.

use crate::actions::{GameAction, GameEvent, Placement};
use crate::game::{Game, GameError};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Greedy,
}

/// A tray slot and where its tile should go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMove {
    pub slot: usize,
    pub placement: Placement,
}

/// A bot player that can decide on moves
pub struct Bot {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a move, or `None` if no tray tile fits anywhere
    pub fn choose_move(&mut self, game: &Game) -> Option<BotMove> {
        if game.is_over() {
            return None;
        }
        let moves = all_moves(game);
        if moves.is_empty() {
            return None;
        }

        match self.difficulty {
            BotDifficulty::Easy => moves.choose(&mut self.rng).copied(),
            BotDifficulty::Greedy => choose_greedy(game, &moves),
        }
    }

    /// The actions that carry out the chosen move
    pub fn choose_actions(&mut self, game: &Game) -> Option<Vec<GameAction>> {
        let chosen = self.choose_move(game)?;
        Some(actions_for(game, chosen))
    }

    /// Choose and apply one move. Returns no events if there was nothing
    /// to place.
    pub fn play(&mut self, game: &mut Game) -> Result<Vec<GameEvent>, GameError> {
        let Some(actions) = self.choose_actions(game) else {
            return Ok(Vec::new());
        };
        let mut events = Vec::new();
        for action in actions {
            events.extend(game.apply_action(action)?);
        }
        Ok(events)
    }
}

/// Every legal move for every filled tray slot
pub fn all_moves(game: &Game) -> Vec<BotMove> {
    (0..game.tray().len())
        .flat_map(|slot| {
            game.valid_placements(slot)
                .into_iter()
                .map(move |placement| BotMove { slot, placement })
        })
        .collect()
}

/// Highest adjacency score, ties broken by completed areas, then by order
fn choose_greedy(game: &Game, moves: &[BotMove]) -> Option<BotMove> {
    let mut best: Option<(BotMove, (u32, usize))> = None;

    for candidate in moves {
        let Some(mut tile) = game.tray().get(candidate.slot).cloned() else {
            continue;
        };
        if tile.set_rotation(candidate.placement.rotation).is_err() {
            continue;
        }
        let Some(preview) = game.session().preview(candidate.placement.hex, &tile) else {
            continue;
        };

        let rank = (preview.points, preview.completes.len());
        if best.map_or(true, |(_, best_rank)| rank > best_rank) {
            best = Some((*candidate, rank));
        }
    }

    best.map(|(chosen, _)| chosen)
}

fn actions_for(game: &Game, chosen: BotMove) -> Vec<GameAction> {
    let current = game
        .tray()
        .get(chosen.slot)
        .map(|tile| tile.rotation())
        .unwrap_or(0);
    let steps = chosen.placement.rotation as i32 - current as i32;

    let mut actions = vec![GameAction::SelectTile(chosen.slot)];
    if steps != 0 {
        actions.push(GameAction::RotateSelected(steps));
    }
    actions.push(GameAction::PlaceSelected(chosen.placement.hex));
    actions
}
