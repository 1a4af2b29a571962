//! Basic type definitions for the room relay
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: UUID-based connection identifier
//! - `RoomCode`: validated, non-empty room code

use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4. Valid only for the lifetime of one WebSocket
/// connection and never persisted. Serialized as the hyphenated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code chosen by clients
///
/// Kept exactly as sent, so `"ABCD"` and `" ABCD"` name different rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse a room code from client input
    ///
    /// Fails with `AppError::InvalidRoomCode` when the code is blank.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.trim().is_empty() {
            return Err(AppError::InvalidRoomCode);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_unique() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_client_id_serializes_as_string() {
        let id = ClientId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_room_code_kept_verbatim() {
        let padded = RoomCode::parse(" AbCd ").unwrap();
        assert_eq!(padded.as_str(), " AbCd ");
        assert_ne!(padded, RoomCode::parse("AbCd").unwrap());
        assert_ne!(RoomCode::parse("abcd").unwrap(), RoomCode::parse("ABCD").unwrap());
    }

    #[test]
    fn test_room_code_rejects_blank() {
        assert!(matches!(RoomCode::parse(""), Err(AppError::InvalidRoomCode)));
        assert!(matches!(RoomCode::parse("   "), Err(AppError::InvalidRoomCode)));
    }
}
