//! Infrastructure layer for tcp-ws-bridge.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections
//! from clients, dialling the upstream TCP endpoint, and moving bytes between
//! the two.
//!
//! # Responsibilities
//!
//! - Owning the bridge lifecycle (`start`/`stop`, endpoint-runner task)
//! - Binding a TCP listener and performing the WebSocket upgrade handshake
//! - Opening one upstream TCP connection per accepted WebSocket session
//! - Running the two per-session forwarding loops
//!
//! # What does NOT belong here?
//!
//! - Wire framing (that is the `bridge-core` crate)
//! - Configuration types (that is the domain layer)
//! - CLI parsing (that is done in `main.rs`)

use std::net::SocketAddr;

use thiserror::Error;

pub mod bridge;
pub mod upstream_conn;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` and embedders can reach
// them without spelling out the module path.
pub use bridge::Bridge;

/// Errors raised while establishing a bridge endpoint or a session.
///
/// All of these stay inside the bridge: endpoint errors leave the bridge
/// `Idle`, session errors end that session alone. None of them is surfaced
/// to callers of `start`/`stop` — they are observed through logs and the
/// bridge's running state.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The listening endpoint could not be bound (port in use, bad host,
    /// missing permission).
    #[error("failed to bind WebSocket endpoint on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The WebSocket upgrade handshake with a client failed.
    #[error("WebSocket handshake with {peer} failed: {source}")]
    Handshake {
        peer: SocketAddr,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// The upstream TCP endpoint could not be dialled for a new session.
    #[error("failed to connect to upstream {addr}: {source}")]
    UpstreamConnect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
