//! RoomServer actor implementation
//!
//! The event router: owns the room registry, the broadcast groups and
//! the table of live connections. Commands arrive on one mpsc queue and
//! are handled one at a time, so no state is ever shared or locked.
//! Outbound events are queued without waiting on delivery.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::group::BroadcastGroups;
use crate::message::ServerEvent;
use crate::registry::RoomRegistry;
use crate::room::Player;
use crate::types::{ClientId, RoomCode};

/// Commands sent from connection handlers to the RoomServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection registered
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// Connection closed
    Disconnect { client_id: ClientId },
    JoinRoom {
        client_id: ClientId,
        room_code: RoomCode,
        player_name: String,
        is_host: bool,
    },
    LeaveRoom {
        client_id: ClientId,
        room_code: RoomCode,
    },
    StartGame {
        client_id: ClientId,
        room_code: RoomCode,
    },
    JoinGame {
        client_id: ClientId,
        room_code: RoomCode,
        player_name: String,
    },
    LeaveGame {
        client_id: ClientId,
        room_code: RoomCode,
    },
    GameAction {
        client_id: ClientId,
        room_code: RoomCode,
        action: Value,
        data: Value,
    },
}

/// The main RoomServer actor
pub struct RoomServer {
    /// All live connections: ClientId -> Connection
    connections: HashMap<ClientId, Connection>,
    rooms: RoomRegistry,
    groups: BroadcastGroups,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RoomServer {
    /// Create a RoomServer with an empty registry
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            connections: HashMap::new(),
            rooms: RoomRegistry::new(),
            groups: BroadcastGroups::new(),
            receiver,
        }
    }

    /// Run the event loop until every command sender is dropped
    pub async fn run(mut self) {
        info!("RoomServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("RoomServer shutting down");
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn groups(&self) -> &BroadcastGroups {
        &self.groups
    }

    /// Process a single command
    pub fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::JoinRoom {
                client_id,
                room_code,
                player_name,
                is_host,
            } => {
                self.handle_join_room(client_id, room_code, player_name, is_host);
            }
            ServerCommand::LeaveRoom {
                client_id,
                room_code,
            } => {
                self.handle_leave_room(client_id, room_code);
            }
            ServerCommand::StartGame {
                client_id,
                room_code,
            } => {
                self.handle_start_game(client_id, room_code);
            }
            ServerCommand::JoinGame {
                client_id,
                room_code,
                player_name,
            } => {
                self.handle_join_game(client_id, room_code, player_name);
            }
            ServerCommand::LeaveGame {
                client_id,
                room_code,
            } => {
                self.handle_leave_game(client_id, room_code);
            }
            ServerCommand::GameAction {
                client_id,
                room_code,
                action,
                data,
            } => {
                self.handle_game_action(client_id, room_code, action, data);
            }
        }
    }

    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerEvent>) {
        info!("Client {} connected", client_id);
        self.connections
            .insert(client_id, Connection::new(client_id, sender));
        debug!(
            "Total connections: {}, Total rooms: {}",
            self.connections.len(),
            self.rooms.len()
        );
    }

    /// Remove the connection from every room it joined
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);
        self.connections.remove(&client_id);
        self.groups.unsubscribe_all(client_id);

        let departure = self.rooms.remove_connection(client_id);
        for room_code in &departure.deleted {
            self.groups.remove_group(room_code);
        }
        for room_code in &departure.remaining {
            self.broadcast_room_update(room_code);
        }

        debug!(
            "Total connections: {}, Total rooms: {}",
            self.connections.len(),
            self.rooms.len()
        );
    }

    fn handle_join_room(
        &mut self,
        client_id: ClientId,
        room_code: RoomCode,
        player_name: String,
        is_host: bool,
    ) {
        if !self.connections.contains_key(&client_id) {
            return;
        }

        info!("{} ({}) joining room {}", player_name, client_id, room_code);

        let room = self.rooms.get_or_create(&room_code, client_id);
        let is_host = is_host || room.host_id() == client_id;
        self.rooms
            .add_player(&room_code, Player::new(client_id, player_name, is_host));
        self.groups.subscribe(&room_code, client_id);

        self.broadcast_room_update(&room_code);

        if let Some(room) = self.rooms.get(&room_code) {
            info!("Room {} now has {} players", room_code, room.player_count());
        }
    }

    fn handle_leave_room(&mut self, client_id: ClientId, room_code: RoomCode) {
        if !self.rooms.contains(&room_code) {
            return;
        }

        info!("Client {} left room {}", client_id, room_code);

        self.rooms.remove_player(&room_code, client_id);
        self.groups.unsubscribe(&room_code, client_id);
        self.settle_room(&room_code);
    }

    /// Non-host senders are ignored without a reply
    fn handle_start_game(&mut self, client_id: ClientId, room_code: RoomCode) {
        if !self.connections.contains_key(&client_id) {
            return;
        }
        if !self.rooms.is_host(&room_code, client_id) {
            debug!(
                "Ignoring start-game for room {} from non-host {}",
                room_code, client_id
            );
            return;
        }

        info!("Starting game in room {}", room_code);
        self.broadcast(&room_code, &ServerEvent::GameStart, None);
    }

    fn handle_join_game(&mut self, client_id: ClientId, room_code: RoomCode, player_name: String) {
        if !self.rooms.contains(&room_code) || !self.connections.contains_key(&client_id) {
            return;
        }

        self.groups.subscribe(&room_code, client_id);
        info!("{} ({}) joined game {}", player_name, client_id, room_code);
    }

    fn handle_leave_game(&mut self, client_id: ClientId, room_code: RoomCode) {
        if self.groups.unsubscribe(&room_code, client_id) {
            debug!("Client {} left game {}", client_id, room_code);
        }
    }

    /// Relay an action to every other subscriber of the room
    fn handle_game_action(
        &mut self,
        client_id: ClientId,
        room_code: RoomCode,
        action: Value,
        data: Value,
    ) {
        if !self.rooms.contains(&room_code) || !self.connections.contains_key(&client_id) {
            return;
        }

        let event = ServerEvent::GameUpdate {
            player_id: client_id,
            action,
            data,
        };
        self.broadcast(&room_code, &event, Some(client_id));
    }

    /// Helper: delete the room if it emptied, otherwise tell the
    /// remaining subscribers about the new player list
    fn settle_room(&mut self, room_code: &RoomCode) {
        if self.rooms.delete_if_empty(room_code) {
            self.groups.remove_group(room_code);
        } else {
            self.broadcast_room_update(room_code);
        }
    }

    fn broadcast_room_update(&self, room_code: &RoomCode) {
        let Some(room) = self.rooms.get(room_code) else {
            return;
        };

        let event = ServerEvent::RoomUpdate {
            players: room.players().to_vec(),
        };
        self.broadcast(room_code, &event, None);
    }

    /// Helper: queue an event for every subscriber of a room's group
    ///
    /// Returns how many connections accepted the event.
    fn broadcast(&self, room_code: &RoomCode, event: &ServerEvent, skip: Option<ClientId>) -> usize {
        let mut delivered = 0;

        for member in self.groups.members(room_code) {
            if Some(member) == skip {
                continue;
            }
            let Some(connection) = self.connections.get(&member) else {
                continue;
            };
            match connection.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "Dropped event for {} in room {}: {}",
                    connection.id, room_code, e
                ),
            }
        }

        delivered
    }
}
