//! Authored tile templates that the tray draws from.

use crate::config::ConfigError;
use crate::tile::{EdgeType, Tile};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tile::EdgeType::{Castle as C, Forest as F, None as N, River as W, Street as S};

/// Label of the tile the board starts with
pub const START_TILE_LABEL: &str = "meadow";

/// Built-in templates. Edge order follows the direction table:
/// S, SW, NW, N, NE, SE.
const STANDARD_TEMPLATES: &[(&str, [EdgeType; 6])] = &[
    ("street-straight", [S, N, N, S, N, N]),
    ("street-bend", [S, N, S, N, N, N]),
    ("street-end", [S, N, N, N, N, N]),
    ("crossroads", [S, N, S, N, S, N]),
    ("castle-cap", [N, N, N, C, N, N]),
    ("castle-wall", [N, N, N, C, C, N]),
    ("castle-hall", [N, N, C, C, C, N]),
    ("forest-patch", [F, F, N, N, N, N]),
    ("forest-grove", [F, F, F, F, N, N]),
    ("river-straight", [W, N, N, W, N, N]),
    ("river-bend", [W, N, W, N, N, N]),
    ("castle-road", [S, N, N, C, N, N]),
    ("riverside-forest", [W, F, F, W, N, N]),
    ("meadow-road", [S, N, N, S, F, F]),
];

/// A set of tile templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCatalog {
    templates: Vec<Tile>,
}

impl TileCatalog {
    pub fn new(templates: Vec<Tile>) -> Self {
        Self { templates }
    }

    /// The built-in template set
    pub fn standard() -> Self {
        let templates = STANDARD_TEMPLATES
            .iter()
            .map(|(label, types)| Tile::from_types(*types).with_label(*label))
            .collect();
        Self { templates }
    }

    /// Parse a catalog authored as JSON. Rejects empty catalogs.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(catalog)
    }

    /// The all-`None` tile placed at the origin when a game starts
    pub fn start_tile() -> Tile {
        Tile::uniform(EdgeType::None).with_label(START_TILE_LABEL)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.templates.iter()
    }

    /// Find a template by label
    pub fn get(&self, label: &str) -> Option<&Tile> {
        self.templates
            .iter()
            .find(|t| t.label.as_deref() == Some(label))
    }

    /// A fresh unplaced copy of a uniformly random template
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<Tile> {
        self.templates.choose(rng).map(Tile::unplaced)
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
