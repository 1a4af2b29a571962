//! Event protocol definitions
//!
//! JSON named events in both directions, framed as
//! `{"event": "<name>", "data": {...}}`. Event names are kebab-case and
//! payload fields are camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::room::Player;
use crate::types::ClientId;

/// Client → Server event
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join a room's lobby, creating the room if needed
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_code: String,
        player_name: String,
        #[serde(default)]
        is_host: bool,
    },
    /// Leave a room's lobby
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_code: String },
    /// Host-only trigger broadcasting `game-start`
    #[serde(rename_all = "camelCase")]
    StartGame { room_code: String },
    /// Subscribe to a room's broadcasts for the play phase
    #[serde(rename_all = "camelCase")]
    JoinGame {
        room_code: String,
        player_name: String,
    },
    /// Unsubscribe from a room's broadcasts
    #[serde(rename_all = "camelCase")]
    LeaveGame { room_code: String },
    /// Opaque game action relayed to the other subscribers
    #[serde(rename_all = "camelCase")]
    GameAction {
        room_code: String,
        action: Value,
        #[serde(default)]
        data: Value,
    },
}

/// Server → Client event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Handshake complete, connection id issued
    Connected { id: ClientId },
    /// Current player list of a room
    RoomUpdate { players: Vec<Player> },
    /// The host started the game
    GameStart,
    /// Another player's game action
    #[serde(rename_all = "camelCase")]
    GameUpdate {
        player_id: ClientId,
        action: Value,
        data: Value,
    },
    /// An inbound frame was rejected
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerEvent::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Frame was not a known event or a required field was missing
    InvalidMessage,
    /// Room code was blank
    InvalidRoomCode,
}

/// Convert AppError to ServerEvent for client notification
impl From<AppError> for ServerEvent {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::InvalidRoomCode => {
                (ErrorCode::InvalidRoomCode, "Room code is required".to_string())
            }
            AppError::InvalidPayload(reason) => (ErrorCode::InvalidMessage, reason.clone()),
            AppError::Json(e) => {
                (ErrorCode::InvalidMessage, format!("Invalid message format: {}", e))
            }
            // Fatal errors are not typically converted (connection closes)
            _ => (ErrorCode::InvalidMessage, "Internal error".to_string()),
        };
        ServerEvent::Error { code, message }
    }
}
