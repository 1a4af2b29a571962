//! WebSocket Room Relay - Entry Point
//!
//! Loads configuration, starts the TCP listener and hands it to the
//! RoomServer accept loop.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use room_relay::{serve, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=room_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("room_relay=info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();

    let listener = TcpListener::bind(&addr).await?;
    info!("Room relay listening on ws://{}", addr);
    info!("Allowed origin: {:?}", config.origin_policy);

    serve(listener, config.origin_policy).await;

    Ok(())
}
