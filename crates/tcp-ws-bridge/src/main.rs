//! tcp-ws-bridge — entry point.
//!
//! This binary accepts WebSocket connections and relays each one to a fixed
//! upstream TCP endpoint. Frames on the TCP side are CR LF delimited; each
//! frame corresponds to exactly one WebSocket message.
//!
//! # Usage
//!
//! ```text
//! tcp-ws-bridge --tcp-host <HOST> --tcp-port <PORT> [OPTIONS]
//!
//! Options:
//!   --tcp-host    <HOST>  Upstream TCP hostname or IP (required)
//!   --tcp-port    <PORT>  Upstream TCP port (required)
//!   --ws-host     <HOST>  WebSocket bind host [default: localhost]
//!   --ws-port     <PORT>  WebSocket bind port [default: 5050]
//!   --buffer-size <N>     Upstream read buffer in bytes [default: 1024]
//! ```
//!
//! # Environment variable overrides
//!
//! Every option can also come from the environment; CLI args take precedence
//! when both are present.
//!
//! | Variable             | Default     | Description                  |
//! |----------------------|-------------|------------------------------|
//! | `BRIDGE_TCP_HOST`    | —           | Upstream TCP host            |
//! | `BRIDGE_TCP_PORT`    | —           | Upstream TCP port            |
//! | `BRIDGE_WS_HOST`     | `localhost` | WebSocket bind host          |
//! | `BRIDGE_WS_PORT`     | `5050`      | WebSocket bind port          |
//! | `BRIDGE_BUFFER_SIZE` | `1024`      | Upstream read buffer (bytes) |
//!
//! Log output is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`); the
//! default level is `info`.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tcp_ws_bridge::{Bridge, BridgeConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// WebSocket-to-TCP byte-stream bridge.
///
/// Accepts WebSocket clients and relays application data between each client
/// and the upstream TCP endpoint, one upstream connection per client.
#[derive(Debug, Parser)]
#[command(
    name = "tcp-ws-bridge",
    about = "Bridge WebSocket clients to an upstream TCP endpoint",
    version
)]
struct Cli {
    /// Hostname or IP address of the upstream TCP endpoint.
    #[arg(long, env = "BRIDGE_TCP_HOST")]
    tcp_host: String,

    /// Port of the upstream TCP endpoint.
    #[arg(long, env = "BRIDGE_TCP_PORT")]
    tcp_port: u16,

    /// Host to bind the WebSocket endpoint to.
    ///
    /// `localhost` accepts only local connections; use `0.0.0.0` to accept
    /// clients from any network interface.
    #[arg(long, default_value = "localhost", env = "BRIDGE_WS_HOST")]
    ws_host: String,

    /// Port to bind the WebSocket endpoint to.
    #[arg(long, default_value_t = 5050, env = "BRIDGE_WS_PORT")]
    ws_port: u16,

    /// Read buffer size in bytes for the upstream TCP stream.
    #[arg(long, default_value_t = 1024, env = "BRIDGE_BUFFER_SIZE")]
    buffer_size: usize,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`BridgeConfig`].
    fn into_bridge_config(self) -> BridgeConfig {
        BridgeConfig {
            tcp_host: self.tcp_host,
            tcp_port: self.tcp_port,
            ws_host: self.ws_host,
            ws_port: self.ws_port,
            buffer_size: self.buffer_size,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_bridge_config();

    info!(
        "tcp-ws-bridge starting — ws {} -> tcp {}",
        config.ws_addr(),
        config.tcp_addr()
    );

    let mut bridge = Bridge::new(config);
    bridge.start().await;
    if !bridge.is_running() {
        // The bind failure itself is already in the logs.
        anyhow::bail!("bridge failed to start");
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("received ctrl-c — shutting down");

    bridge.stop().await;
    info!("tcp-ws-bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
