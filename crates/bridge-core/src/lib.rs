//! # bridge-core
//!
//! Shared wire-framing library for tcp-ws-bridge.
//!
//! The bridge relays application data between a message-oriented transport
//! (WebSocket) and a byte-stream transport (TCP). This crate defines the one
//! piece of protocol knowledge the two sides share: how the byte stream is
//! cut into frames.
//!
//! - **`framing`** – The CR LF delimiter codec. A frame is the run of bytes
//!   between two delimiters; each frame corresponds to exactly one WebSocket
//!   message on the other side of the bridge.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or network
//! sockets, so the codec can be unit-tested and benchmarked in isolation.

pub mod framing;

// Re-export the most-used items at the crate root so callers can write
// `bridge_core::FrameDecoder` instead of `bridge_core::framing::FrameDecoder`.
pub use framing::{decode_frames, encode_frame, FrameDecoder, DELIMITER};
