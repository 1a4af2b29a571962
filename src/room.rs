//! Room and Player definitions
//!
//! A room holds an ordered player list and the id of the connection
//! that created it.

use serde::Serialize;

use crate::types::{ClientId, RoomCode};

/// A member of a room's lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: ClientId,
    pub name: String,
    pub is_host: bool,
}

impl Player {
    pub fn new(id: ClientId, name: String, is_host: bool) -> Self {
        Self { id, name, is_host }
    }
}

/// Multiplayer room
///
/// The host is fixed when the room is created and is never reassigned,
/// even after the host leaves.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    host_id: ClientId,
    players: Vec<Player>,
}

impl Room {
    /// Create an empty room owned by `host_id`
    pub fn new(code: RoomCode, host_id: ClientId) -> Self {
        Self {
            code,
            host_id,
            players: Vec::new(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host_id(&self) -> ClientId {
        self.host_id
    }

    /// Players in join order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Check if a connection is in this room
    pub fn contains(&self, client_id: ClientId) -> bool {
        self.players.iter().any(|p| p.id == client_id)
    }

    /// Append a player
    ///
    /// Returns false without changing anything if a player with the
    /// same id is already present.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.contains(player.id) {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Remove a player by connection id
    ///
    /// Returns true if a player was removed.
    pub fn remove_player(&mut self, client_id: ClientId) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == client_id) else {
            return false;
        };
        self.players.remove(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> RoomCode {
        RoomCode::parse("ABCD").unwrap()
    }

    #[test]
    fn test_room_creation() {
        let host_id = ClientId::new();
        let room = Room::new(code(), host_id);

        assert_eq!(room.code(), &code());
        assert_eq!(room.host_id(), host_id);
        assert!(room.is_empty());
        assert_eq!(room.player_count(), 0);
    }

    #[test]
    fn test_add_player_is_idempotent() {
        let host_id = ClientId::new();
        let mut room = Room::new(code(), host_id);

        assert!(room.add_player(Player::new(host_id, "Alice".into(), true)));
        assert!(!room.add_player(Player::new(host_id, "Alice again".into(), false)));

        assert_eq!(room.player_count(), 1);
        assert_eq!(room.players()[0].name, "Alice");
    }

    #[test]
    fn test_players_keep_join_order() {
        let mut room = Room::new(code(), ClientId::new());
        let ids: Vec<ClientId> = (0..3).map(|_| ClientId::new()).collect();
        for (i, id) in ids.iter().enumerate() {
            room.add_player(Player::new(*id, format!("p{}", i), false));
        }

        room.remove_player(ids[1]);

        let remaining: Vec<ClientId> = room.players().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_remove_unknown_player() {
        let host_id = ClientId::new();
        let mut room = Room::new(code(), host_id);
        room.add_player(Player::new(host_id, "Alice".into(), true));

        assert!(!room.remove_player(ClientId::new()));
        assert!(room.remove_player(host_id));
        assert!(room.is_empty());
        // Host id survives the host leaving
        assert_eq!(room.host_id(), host_id);
    }

    #[test]
    fn test_player_serializes_camel_case() {
        let id = ClientId::new();
        let json = serde_json::to_value(Player::new(id, "Bob".into(), false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": id.to_string(), "name": "Bob", "isHost": false })
        );
    }
}
