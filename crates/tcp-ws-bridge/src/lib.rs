//! tcp-ws-bridge library crate.
//!
//! This crate provides a bidirectional byte-stream bridge: it accepts
//! WebSocket client connections and relays application data between each
//! client and a fixed upstream TCP endpoint.
//!
//! # Architecture
//!
//! ```text
//! WebSocket clients (one message per frame)
//!         ↕
//! [tcp-ws-bridge]
//!   ├── domain/           Pure types: BridgeConfig, BridgeState
//!   └── infrastructure/
//!         ├── bridge/        Lifecycle manager (start/stop state machine)
//!         ├── ws_server/     WebSocket endpoint + per-session coordinator
//!         └── upstream_conn/ TCP dial + the two forwarding loops
//!         ↕
//! Upstream TCP endpoint (CR LF delimited byte stream, bridge-core framing)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `infrastructure` depends on `domain`, `bridge-core`, `tokio`, and
//!   `tungstenite`.
//!
//! The wire framing itself lives in the `bridge-core` crate so the codec can
//! be tested and benchmarked without any networking.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Infrastructure layer: bridge lifecycle, WebSocket endpoint, upstream TCP.
pub mod infrastructure;

// Re-export the public surface at the crate root so embedders can write
// `tcp_ws_bridge::Bridge` without spelling out the layer path.
pub use domain::{BridgeConfig, BridgeState};
pub use infrastructure::{Bridge, BridgeError};
