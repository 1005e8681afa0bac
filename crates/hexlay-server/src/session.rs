//! One puzzle per connected player.

use hexlay_core::{ConfigError, Game, GameAction, GameConfig, GameError, GameEvent, Placement};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No game running")]
    NoGame,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A player's puzzle
pub struct PuzzleSession {
    pub player_id: Uuid,
    config: GameConfig,
    game: Option<Game>,
}

impl PuzzleSession {
    pub fn new(player_id: Uuid, config: GameConfig) -> Self {
        Self {
            player_id,
            config,
            game: None,
        }
    }

    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }

    /// Start a fresh game, with `seed` overriding the configured one
    pub fn new_game(&mut self, seed: Option<u64>) -> Result<(), SessionError> {
        let mut config = self.config.clone();
        if seed.is_some() {
            config.seed = seed;
        }
        self.game = Some(Game::new(config)?);
        Ok(())
    }

    pub fn apply_action(
        &mut self,
        action: serde_json::Value,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoGame)?;

        let action: GameAction = serde_json::from_value(action)
            .map_err(|e| SessionError::InvalidAction(e.to_string()))?;

        Ok(game.apply_action(action)?)
    }

    pub fn get_game_state(&self) -> Result<serde_json::Value, SessionError> {
        let game = self.game.as_ref().ok_or(SessionError::NoGame)?;
        Ok(serde_json::to_value(game.snapshot())?)
    }

    pub fn hints(&self, slot: usize) -> Result<Vec<Placement>, SessionError> {
        let game = self.game.as_ref().ok_or(SessionError::NoGame)?;
        Ok(game.valid_placements(slot))
    }

    /// Final score once the game has run out of tiles
    pub fn final_score(&self) -> Option<u32> {
        let game = self.game.as_ref()?;
        game.is_over().then(|| game.score())
    }
}
