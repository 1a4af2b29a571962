//! WebSocket Room Relay Library
//!
//! Coordinates ephemeral multiplayer rooms over WebSockets, built with
//! tokio-tungstenite using the Actor pattern for state management.
//!
//! # Features
//! - Join rooms by code; the first joiner becomes the host
//! - Live `room-update` membership broadcasts
//! - Host-only `game-start`
//! - Opaque `game-action` relay to every other subscriber
//! - Empty rooms are deleted as soon as the last player leaves
//! - Disconnects clean up every room the connection joined
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RoomServer` is the central actor owning the room registry
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use room_relay::{serve, OriginPolicy};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     serve(listener, OriginPolicy::Any).await;
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod group;
pub mod handler;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use config::{Config, OriginPolicy};
pub use connection::Connection;
pub use error::{AppError, ConfigError, SendError};
pub use group::BroadcastGroups;
pub use handler::{handle_connection, serve};
pub use message::{ClientEvent, ErrorCode, ServerEvent};
pub use registry::{Departure, RoomRegistry};
pub use room::{Player, Room};
pub use server::{RoomServer, ServerCommand};
pub use types::{ClientId, RoomCode};
