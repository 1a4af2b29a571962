//! Error types for the room relay
//!
//! Defines application-level errors, outbound delivery errors and
//! configuration errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Transport errors end the connection. Payload errors are reported
/// back to the sender as an `error` event and the frame is dropped.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Room code missing or blank
    #[error("Invalid room code")]
    InvalidRoomCode,

    /// Payload decoded but failed validation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Outbound delivery errors
///
/// Broadcasts never wait on a connection, so a full queue is an error too.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The connection's outbound queue is full
    #[error("Channel full")]
    ChannelFull,
}

/// Configuration errors (fatal at startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("ALLOWED_ORIGIN must not be empty")]
    EmptyOrigin,
}
