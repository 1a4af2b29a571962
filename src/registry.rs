//! Room registry
//!
//! In-memory mapping from room code to room state, plus a secondary
//! index from connection to the codes of the rooms it belongs to.
//! Rooms exist only while they have at least one player.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::room::{Player, Room};
use crate::types::{ClientId, RoomCode};

/// Outcome of removing a connection from every room it joined
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Departure {
    /// Rooms that still have players
    pub remaining: Vec<RoomCode>,
    /// Rooms deleted because the connection was their last player
    pub deleted: Vec<RoomCode>,
}

/// All live rooms, owned by the router
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// RoomCode -> Room
    rooms: HashMap<RoomCode, Room>,
    /// ClientId -> codes of rooms listing that connection as a player
    memberships: HashMap<ClientId, BTreeSet<RoomCode>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room for `code`, creating an empty one hosted by
    /// `creator_id` if it does not exist yet.
    pub fn get_or_create(&mut self, code: &RoomCode, creator_id: ClientId) -> &mut Room {
        self.rooms.entry(code.clone()).or_insert_with(|| {
            info!("Room {} created by {}", code, creator_id);
            Room::new(code.clone(), creator_id)
        })
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Number of live rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Add a player to an existing room
    ///
    /// Returns false if the room does not exist or already lists the
    /// player's id.
    pub fn add_player(&mut self, code: &RoomCode, player: Player) -> bool {
        let Some(room) = self.rooms.get_mut(code) else {
            return false;
        };

        let client_id = player.id;
        if !room.add_player(player) {
            debug!("Client {} already in room {}", client_id, code);
            return false;
        }

        self.memberships
            .entry(client_id)
            .or_default()
            .insert(code.clone());
        true
    }

    /// Remove a player from a room
    ///
    /// Callers must follow up with `delete_if_empty`.
    pub fn remove_player(&mut self, code: &RoomCode, client_id: ClientId) -> bool {
        let removed = self
            .rooms
            .get_mut(code)
            .is_some_and(|room| room.remove_player(client_id));

        if removed {
            if let Some(codes) = self.memberships.get_mut(&client_id) {
                codes.remove(code);
                if codes.is_empty() {
                    self.memberships.remove(&client_id);
                }
            }
        }

        removed
    }

    /// Drop the room if its player list is empty
    ///
    /// Returns true if the room was deleted.
    pub fn delete_if_empty(&mut self, code: &RoomCode) -> bool {
        if !self.rooms.get(code).is_some_and(Room::is_empty) {
            return false;
        }
        self.rooms.remove(code);
        info!("Room {} deleted (empty)", code);
        true
    }

    /// True iff the room exists and `client_id` created it
    pub fn is_host(&self, code: &RoomCode, client_id: ClientId) -> bool {
        self.rooms
            .get(code)
            .is_some_and(|room| room.host_id() == client_id)
    }

    /// Invoke `f` for every room listing `client_id` as a player
    ///
    /// Rooms are visited in code order.
    pub fn for_each_room_containing<F>(&self, client_id: ClientId, mut f: F)
    where
        F: FnMut(&Room),
    {
        let Some(codes) = self.memberships.get(&client_id) else {
            return;
        };

        for code in codes {
            if let Some(room) = self.rooms.get(code) {
                f(room);
            }
        }
    }

    /// Codes of the rooms listing `client_id`, in code order
    pub fn rooms_of(&self, client_id: ClientId) -> Vec<RoomCode> {
        let mut codes = Vec::new();
        self.for_each_room_containing(client_id, |room| codes.push(room.code().clone()));
        codes
    }

    /// Remove a connection from every room it joined, deleting rooms
    /// it leaves empty
    pub fn remove_connection(&mut self, client_id: ClientId) -> Departure {
        let mut departure = Departure::default();

        for code in self.rooms_of(client_id) {
            self.remove_player(&code, client_id);
            if self.delete_if_empty(&code) {
                departure.deleted.push(code);
            } else {
                departure.remaining.push(code);
            }
        }

        departure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> RoomCode {
        RoomCode::parse(raw).unwrap()
    }

    fn join(registry: &mut RoomRegistry, room: &RoomCode, id: ClientId, name: &str) -> bool {
        registry.get_or_create(room, id);
        registry.add_player(room, Player::new(id, name.to_string(), false))
    }

    #[test]
    fn test_get_or_create_sets_host_once() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let bob = ClientId::new();
        let room = code("ABCD");

        assert_eq!(registry.get_or_create(&room, alice).host_id(), alice);
        assert_eq!(registry.get_or_create(&room, bob).host_id(), alice);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_player_requires_room() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();

        let added = registry.add_player(&code("NOPE"), Player::new(alice, "Alice".into(), false));

        assert!(!added);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_join_keeps_single_entry() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let room = code("ABCD");

        assert!(join(&mut registry, &room, alice, "Alice"));
        assert!(!join(&mut registry, &room, alice, "Alice"));

        assert_eq!(registry.get(&room).unwrap().player_count(), 1);
    }

    #[test]
    fn test_delete_if_empty() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let bob = ClientId::new();
        let room = code("ABCD");
        join(&mut registry, &room, alice, "Alice");
        join(&mut registry, &room, bob, "Bob");

        assert!(registry.remove_player(&room, alice));
        assert!(!registry.delete_if_empty(&room));
        assert!(registry.contains(&room));

        assert!(registry.remove_player(&room, bob));
        assert!(registry.delete_if_empty(&room));
        assert!(!registry.contains(&room));

        // A fresh room under the same code gets a new host
        assert_eq!(registry.get_or_create(&room, bob).host_id(), bob);
    }

    #[test]
    fn test_remove_player_not_present() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let room = code("ABCD");
        join(&mut registry, &room, alice, "Alice");

        assert!(!registry.remove_player(&room, ClientId::new()));
        assert!(!registry.remove_player(&code("ZZZZ"), alice));
        assert_eq!(registry.get(&room).unwrap().player_count(), 1);
    }

    #[test]
    fn test_is_host() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let bob = ClientId::new();
        let room = code("ABCD");
        join(&mut registry, &room, alice, "Alice");
        join(&mut registry, &room, bob, "Bob");

        assert!(registry.is_host(&room, alice));
        assert!(!registry.is_host(&room, bob));
        assert!(!registry.is_host(&code("ZZZZ"), alice));
    }

    #[test]
    fn test_for_each_room_containing_uses_index() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let bob = ClientId::new();
        for raw in ["R1", "R2", "R3"] {
            join(&mut registry, &code(raw), alice, "Alice");
        }
        join(&mut registry, &code("R4"), bob, "Bob");
        registry.remove_player(&code("R2"), alice);
        registry.delete_if_empty(&code("R2"));

        let mut seen = Vec::new();
        registry.for_each_room_containing(alice, |room| seen.push(room.code().clone()));

        assert_eq!(seen, vec![code("R1"), code("R3")]);
    }

    #[test]
    fn test_remove_connection() {
        let mut registry = RoomRegistry::new();
        let alice = ClientId::new();
        let bob = ClientId::new();
        for raw in ["R1", "R2", "R3"] {
            join(&mut registry, &code(raw), alice, "Alice");
        }
        join(&mut registry, &code("R2"), bob, "Bob");

        assert_eq!(registry.rooms_of(alice), vec![code("R1"), code("R2"), code("R3")]);

        let departure = registry.remove_connection(alice);

        assert_eq!(departure.remaining, vec![code("R2")]);
        assert_eq!(departure.deleted, vec![code("R1"), code("R3")]);
        assert!(registry.rooms_of(alice).is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&code("R2")).unwrap().players()[0].id, bob);

        // Nothing left to remove
        assert_eq!(registry.remove_connection(alice), Departure::default());
    }

    #[test]
    fn test_for_each_room_containing_unknown_client() {
        let registry = RoomRegistry::new();
        let mut calls = 0;
        registry.for_each_room_containing(ClientId::new(), |_| calls += 1);
        assert_eq!(calls, 0);
    }
}
