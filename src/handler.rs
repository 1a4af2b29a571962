//! WebSocket connection handler
//!
//! Accepts TCP connections, performs the WebSocket handshake (with an
//! `Origin` check), decodes inbound events into commands for the
//! RoomServer and writes outbound events back to the socket.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::config::OriginPolicy;
use crate::error::AppError;
use crate::message::{ClientEvent, ServerEvent};
use crate::server::{RoomServer, ServerCommand};
use crate::types::{ClientId, RoomCode};

/// Channel buffer size for server commands
const COMMAND_BUFFER_SIZE: usize = 256;

/// Per-connection outbound queue size
const OUTBOUND_BUFFER_SIZE: usize = 64;

/// Start the RoomServer actor and accept connections forever
pub async fn serve(listener: TcpListener, origin_policy: OriginPolicy) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
    tokio::spawn(RoomServer::new(cmd_rx).run());

    info!("RoomServer actor started");

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();
                let origin_policy = origin_policy.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, origin_policy).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers the connection with the
/// RoomServer and pumps events both ways until either side closes.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    origin_policy: OriginPolicy,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let check_origin = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let origin = request
            .headers()
            .get(ORIGIN)
            .map(|value| value.to_str().unwrap_or_default());
        if origin_policy.allows(origin) {
            return Ok(response);
        }

        warn!("Rejected handshake from {} with origin {:?}", peer_addr, origin);
        let mut rejection = ErrorResponse::new(Some("Origin not allowed".to_string()));
        *rejection.status_mut() = StatusCode::FORBIDDEN;
        Err(rejection)
    };

    let ws_stream = tokio_tungstenite::accept_hdr_async(stream, check_origin).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = ClientId::new();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Server -> client events; the read task keeps a clone for error replies
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER_SIZE);
    let reply_tx = event_tx.clone();

    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            sender: event_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    let connected = serde_json::to_string(&ServerEvent::Connected { id: client_id })?;
    ws_sender.send(Message::Text(connected.into())).await?;

    let cmd_tx_read = cmd_tx.clone();

    // WebSocket -> ServerCommand
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match decode_command(client_id, &text) {
                    Ok(cmd) => {
                        if cmd_tx_read.send(cmd).await.is_err() {
                            debug!("Server closed, ending read task for {}", client_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Invalid event from {}: {}", client_id, e);
                        if let Err(dropped) = reply_tx.try_send(e.into()) {
                            debug!("Dropped error reply for {}: {}", client_id, dropped);
                        }
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(_) => {
                    // Ping/pong are answered by tungstenite; binary is ignored
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // ServerEvent -> WebSocket
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                }
            }
        }

        let _ = ws_sender.close().await;
    });

    // Whichever side finishes first takes the other down with it, so no
    // command from this connection can follow its Disconnect
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", client_id);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", client_id);
            read_task.abort();
        }
    }

    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Decode and validate one text frame
pub fn decode_command(client_id: ClientId, text: &str) -> Result<ServerCommand, AppError> {
    let event: ClientEvent = serde_json::from_str(text)?;
    client_event_to_command(client_id, event)
}

/// Convert a ClientEvent to a ServerCommand
fn client_event_to_command(client_id: ClientId, event: ClientEvent) -> Result<ServerCommand, AppError> {
    let cmd = match event {
        ClientEvent::JoinRoom {
            room_code,
            player_name,
            is_host,
        } => ServerCommand::JoinRoom {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
            player_name: validate_player_name(player_name)?,
            is_host,
        },
        ClientEvent::LeaveRoom { room_code } => ServerCommand::LeaveRoom {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
        },
        ClientEvent::StartGame { room_code } => ServerCommand::StartGame {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
        },
        ClientEvent::JoinGame {
            room_code,
            player_name,
        } => ServerCommand::JoinGame {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
            player_name,
        },
        ClientEvent::LeaveGame { room_code } => ServerCommand::LeaveGame {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
        },
        ClientEvent::GameAction {
            room_code,
            action,
            data,
        } => ServerCommand::GameAction {
            client_id,
            room_code: RoomCode::parse(&room_code)?,
            action,
            data,
        },
    };
    Ok(cmd)
}

/// Lobby names are shown to other players exactly as sent, but a
/// blank one is rejected
fn validate_player_name(name: String) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidPayload(
            "playerName must not be empty".to_string(),
        ));
    }
    Ok(name)
}
