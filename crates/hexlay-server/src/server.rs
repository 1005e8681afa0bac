//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{PuzzleSession, SessionError};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use hexlay_core::GameConfig;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// One puzzle per connected player
    pub sessions: DashMap<Uuid, PuzzleSession>,
    /// Mapping from player ID to their message sender
    pub player_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Config every new game starts from
    pub config: GameConfig,
}

impl ServerState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            player_senders: DashMap::new(),
            config,
        }
    }

    /// Send a message to a specific player.
    pub fn send_to_player(&self, player_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.player_senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn send_error(&self, player_id: Uuid, err: SessionError) {
        self.send_to_player(
            player_id,
            ServerMessage::Error {
                message: err.to_string(),
            },
        );
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Hexlay server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Assign a player ID
    let player_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.player_senders.insert(player_id, tx);
    state
        .sessions
        .insert(player_id, PuzzleSession::new(player_id, state.config.clone()));

    // Send welcome message
    let welcome = ServerMessage::Welcome { player_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                    handle_message(player_id, client_msg, &state);
                } else {
                    warn!("Invalid message from {}: {}", player_id, text);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_player(player_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.sessions.remove(&player_id);
    state.player_senders.remove(&player_id);
    send_task.abort();

    info!("Connection closed for {}", player_id);
    Ok(())
}

/// Serialize a list for the wire
fn to_values<T: Serialize>(items: &[T]) -> Result<Vec<serde_json::Value>, SessionError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(SessionError::from))
        .collect()
}

/// Handle a client message.
fn handle_message(player_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let Some(mut session) = state.sessions.get_mut(&player_id) else {
        warn!("Message from {} without a session", player_id);
        return;
    };

    match msg {
        ClientMessage::NewGame { seed } => {
            let started = session
                .new_game(seed)
                .and_then(|()| session.get_game_state());
            drop(session);

            match started {
                Ok(game_state) => {
                    info!("Player {} started a new game", player_id);
                    state.send_to_player(player_id, ServerMessage::GameStarted { state: game_state });
                }
                Err(e) => state.send_error(player_id, e),
            }
        }

        ClientMessage::GameAction { action } => {
            let result = session.apply_action(action).and_then(|events| {
                let events = to_values(&events)?;
                let game_state = session.get_game_state()?;
                Ok((events, game_state, session.final_score()))
            });
            drop(session);

            match result {
                Ok((events, game_state, final_score)) => {
                    debug!("Player {} action produced {} events", player_id, events.len());

                    // Send action result to the acting player
                    state.send_to_player(
                        player_id,
                        ServerMessage::ActionResult {
                            success: true,
                            events,
                            error: None,
                        },
                    );
                    state.send_to_player(player_id, ServerMessage::GameState { state: game_state });

                    if let Some(final_score) = final_score {
                        state.send_to_player(player_id, ServerMessage::GameOver { final_score });
                    }
                }
                Err(e) => {
                    state.send_to_player(
                        player_id,
                        ServerMessage::ActionResult {
                            success: false,
                            events: vec![],
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }

        ClientMessage::GetState => {
            let result = session.get_game_state();
            drop(session);

            match result {
                Ok(game_state) => {
                    state.send_to_player(player_id, ServerMessage::GameState { state: game_state })
                }
                Err(e) => state.send_error(player_id, e),
            }
        }

        ClientMessage::GetHints { slot } => {
            let result = session.hints(slot).and_then(|hints| to_values(&hints));
            drop(session);

            match result {
                Ok(placements) => state.send_to_player(player_id, ServerMessage::Hints { placements }),
                Err(e) => state.send_error(player_id, e),
            }
        }

        ClientMessage::Ping => {
            drop(session);
            state.send_to_player(player_id, ServerMessage::Pong);
        }
    }
}
