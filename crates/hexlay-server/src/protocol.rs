//! WebSocket protocol messages for hexlay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a new puzzle, replacing any running one
    NewGame {
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Submit a game action
    GameAction { action: serde_json::Value },

    /// Request the current game state
    GetState,

    /// Request legal placements for a tray slot
    GetHints { slot: usize },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned player ID
    Welcome { player_id: Uuid },

    /// Game started
    GameStarted { state: serde_json::Value },

    /// Game state updated
    GameState { state: serde_json::Value },

    /// Result of a submitted action
    ActionResult {
        success: bool,
        events: Vec<serde_json::Value>,
        error: Option<String>,
    },

    /// Legal placements for the requested slot
    Hints { placements: Vec<serde_json::Value> },

    /// No tiles left to place
    GameOver { final_score: u32 },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"GetHints","payload":{"slot":2}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::GetHints { slot: 2 }));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"NewGame","payload":{}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::NewGame { seed: None }));
    }

    #[test]
    fn test_server_message_format() {
        let json = serde_json::to_string(&ServerMessage::GameOver { final_score: 900 }).unwrap();
        assert_eq!(json, r#"{"type":"GameOver","payload":{"final_score":900}}"#);
    }
}
