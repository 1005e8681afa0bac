//! Game configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::layout::{Layout, OrientationKind, Point3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Hex size must be a positive finite number, got {0}")]
    InvalidHexSize(f64),

    #[error("Tray must have at least one slot")]
    EmptyTray,

    #[error("Tile catalog has no templates")]
    EmptyCatalog,
}

/// Board geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: OrientationKind,
    pub hex_size: f64,
    pub origin: Point3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: OrientationKind::Flat,
            hex_size: 1.0,
            origin: Point3::ZERO,
        }
    }
}

impl LayoutConfig {
    pub fn to_layout(&self) -> Layout {
        Layout::new(self.orientation, self.hex_size, self.origin)
    }
}

/// Points and rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for each occupied neighbour of a newly placed tile
    pub points_per_edge: u32,
    /// Tiles added to the reserve for each completed area
    pub completion_tile_reward: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_edge: 100,
            completion_tile_reward: 5,
        }
    }
}

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub layout: LayoutConfig,
    pub scoring: ScoringConfig,
    /// Tiles available to draw at the start of a game
    pub starting_reserve: u32,
    /// Number of tray slots
    pub tray_size: usize,
    /// Seed for tile draws. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            scoring: ScoringConfig::default(),
            starting_reserve: 10,
            tray_size: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.layout.hex_size;
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::InvalidHexSize(size));
        }
        if self.tray_size == 0 {
            return Err(ConfigError::EmptyTray);
        }
        Ok(())
    }

    /// Same config with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
