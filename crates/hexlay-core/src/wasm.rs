//! WebAssembly bindings for the hexlay engine.
//!
//! This module exposes the game loop and the board queries to JavaScript
//! through wasm-bindgen.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameAction;
#[cfg(feature = "wasm")]
use crate::bot::{Bot, BotDifficulty};
#[cfg(feature = "wasm")]
use crate::config::GameConfig;
#[cfg(feature = "wasm")]
use crate::game::Game;
#[cfg(feature = "wasm")]
use crate::hex::Hex;
#[cfg(feature = "wasm")]
use crate::layout::Point3;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game from a JSON config. An empty string uses the
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        let game = Game::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { game })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.game.apply_action(action) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Legal placements for a tray slot as a JSON array
    #[wasm_bindgen(js_name = getValidPlacements)]
    pub fn get_valid_placements(&self, slot: usize) -> String {
        serde_json::to_string(&self.game.valid_placements(slot))
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Whether the selected tile may go at `(q, r)`
    #[wasm_bindgen(js_name = canPlaceSelected)]
    pub fn can_place_selected(&self, q: i32, r: i32) -> bool {
        match self.game.tray().selected_tile() {
            Some(tile) => self.game.grid().can_place(Hex::new(q, r), tile),
            None => false,
        }
    }

    /// World position of a hex centre as `[x, y, z]`
    #[wasm_bindgen(js_name = hexToWorld)]
    pub fn hex_to_world(&self, q: i32, r: i32) -> Vec<f64> {
        let p = self.game.grid().hex_to_world(Hex::new(q, r));
        vec![p.x, p.y, p.z]
    }

    /// Hex under a world position as `[q, r, s]`
    #[wasm_bindgen(js_name = worldToHex)]
    pub fn world_to_hex(&self, x: f64, y: f64, z: f64) -> Vec<i32> {
        let hex = self.game.grid().world_to_hex(Point3::new(x, y, z));
        vec![hex.q, hex.r, hex.s()]
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.game.phase()).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// Get a bot's suggested actions as a JSON array
    /// difficulty: "Easy" or "Greedy"
    #[wasm_bindgen(js_name = getBotActions)]
    pub fn get_bot_actions(&self, difficulty: &str) -> String {
        let diff = match difficulty {
            "Easy" => BotDifficulty::Easy,
            _ => BotDifficulty::Greedy,
        };

        let mut bot = Bot::new(diff);
        match bot.choose_actions(&self.game) {
            Some(actions) => serde_json::to_string(&actions).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }
}
