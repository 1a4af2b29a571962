//! Connection struct definition
//!
//! The router's handle on a live WebSocket connection: its id and the
//! queue feeding that connection's write task.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::ClientId;

/// Connected client
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Server → Client event queue
    pub sender: mpsc::Sender<ServerEvent>,
}

impl Connection {
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, sender }
    }

    /// Queue an event for this connection without waiting
    ///
    /// Fails if the queue is full or the connection has gone away.
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => SendError::ChannelFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}
