//! Domain layer for tcp-ws-bridge.
//!
//! The domain layer contains pure business-logic types that have no
//! dependencies on I/O, networking, or external frameworks.
//!
//! # What belongs in the domain layer?
//!
//! - The bridge configuration ([`BridgeConfig`])
//! - The lifecycle state ([`BridgeState`])
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - Task handles or shutdown channels (those live with the lifecycle
//!   manager in the infrastructure layer)

pub mod config;
pub mod state;

// Re-export the commonly needed types at the domain module boundary.
pub use config::BridgeConfig;
pub use state::BridgeState;
