//! Broadcast groups
//!
//! Per-room subscription sets. Being subscribed to a room's group is
//! independent of being listed as one of its players: lobby joins
//! subscribe implicitly, while `join-game`/`leave-game` toggle only
//! the subscription.

use std::collections::{HashMap, HashSet};

use crate::types::{ClientId, RoomCode};

#[derive(Debug, Default)]
pub struct BroadcastGroups {
    groups: HashMap<RoomCode, HashSet<ClientId>>,
}

impl BroadcastGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection; returns false if it already was
    pub fn subscribe(&mut self, code: &RoomCode, client_id: ClientId) -> bool {
        self.groups.entry(code.clone()).or_default().insert(client_id)
    }

    /// Unsubscribe a connection; returns false if it was not subscribed
    pub fn unsubscribe(&mut self, code: &RoomCode, client_id: ClientId) -> bool {
        let Some(members) = self.groups.get_mut(code) else {
            return false;
        };
        let removed = members.remove(&client_id);
        if members.is_empty() {
            self.groups.remove(code);
        }
        removed
    }

    /// Drop every subscription held by a connection
    ///
    /// Returns the number of groups it left.
    pub fn unsubscribe_all(&mut self, client_id: ClientId) -> usize {
        let mut left = 0;
        self.groups.retain(|_, members| {
            if members.remove(&client_id) {
                left += 1;
            }
            !members.is_empty()
        });
        left
    }

    /// Forget a group entirely (its room was deleted)
    pub fn remove_group(&mut self, code: &RoomCode) {
        self.groups.remove(code);
    }

    pub fn is_subscribed(&self, code: &RoomCode, client_id: ClientId) -> bool {
        self.groups
            .get(code)
            .is_some_and(|members| members.contains(&client_id))
    }

    /// Current subscribers of a group
    pub fn members<'a>(&'a self, code: &RoomCode) -> impl Iterator<Item = ClientId> + 'a {
        self.groups
            .get(code)
            .into_iter()
            .flat_map(|members| members.iter().copied())
    }
}
