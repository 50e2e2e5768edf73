//! TCP connection management for the upstream endpoint, plus the two
//! per-session forwarding loops.
//!
//! Each accepted WebSocket session gets its own TCP connection to the
//! upstream. The upstream treats the bridge as just another TCP client.
//!
//! # Ownership split
//!
//! The two forwarders touch disjoint resources: [`forward_upstream_to_ws`]
//! owns the TCP read half and the WebSocket sink, [`forward_ws_to_upstream`]
//! owns the WebSocket stream and the TCP write half. The write half is
//! closed by the WebSocket-side forwarder when its message sequence ends;
//! that forwarder then fires the session's teardown token so the reader
//! loop exits promptly instead of blocking on a host that never sends EOF.
//!
//! # Byte-stream framing
//!
//! TCP is a *stream* protocol: a single `read()` may return a fraction of a
//! frame or several frames at once. The reader loop feeds everything into a
//! [`FrameDecoder`], which retains partial frames across reads and hands
//! back complete ones.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bridge_core::framing::{encode_frame, FrameDecoder};

use crate::infrastructure::BridgeError;

/// Write end of an accepted WebSocket connection.
pub type WsSink = SplitSink<WebSocketStream<TcpStream>, WsMessage>;

/// Read end of an accepted WebSocket connection.
pub type WsStream = SplitStream<WebSocketStream<TcpStream>>;

// ── Upstream dial ─────────────────────────────────────────────────────────────

/// A freshly dialled TCP connection to the upstream endpoint, already split
/// into independently owned halves so each forwarder can take one.
pub struct UpstreamConnection {
    /// Read half of the upstream TCP stream.
    pub read_half: OwnedReadHalf,
    /// Write half of the upstream TCP stream.
    pub write_half: OwnedWriteHalf,
}

impl UpstreamConnection {
    /// Opens a new TCP connection to the upstream at `addr` (`"host:port"`).
    ///
    /// Suspends until the connection is established or fails; there is no
    /// retry and no timeout beyond the OS's own.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UpstreamConnect`] if the dial fails (upstream
    /// not running, unresolvable host, firewall).
    pub async fn connect(addr: &str) -> Result<Self, BridgeError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| BridgeError::UpstreamConnect {
                addr: addr.to_string(),
                source,
            })?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            read_half,
            write_half,
        })
    }
}

// ── Upstream TCP → WebSocket ──────────────────────────────────────────────────

/// Reads the upstream byte stream and forwards each complete frame as one
/// binary WebSocket message.
///
/// The loop ends on upstream EOF (zero-length read), on a read error, on a
/// failed WebSocket send (the client went away — an expected race during
/// teardown, not a hard error), or when `teardown` fires.
///
/// This forwarder closes neither transport; it hands the WebSocket sink back
/// to the session coordinator, which owns the close. Any partial frame left
/// in the decoder at stream end is discarded, never forwarded.
pub async fn forward_upstream_to_ws(
    mut read_half: OwnedReadHalf,
    mut ws_tx: WsSink,
    buffer_size: usize,
    teardown: CancellationToken,
    session_id: Uuid,
) -> WsSink {
    let mut decoder = FrameDecoder::with_capacity(buffer_size);
    let mut read_tmp = vec![0u8; buffer_size];

    debug!("session {session_id}: upstream reader started");

    'outer: loop {
        let n = tokio::select! {
            _ = teardown.cancelled() => {
                debug!("session {session_id}: upstream reader cancelled by teardown");
                break;
            }
            result = read_half.read(&mut read_tmp) => match result {
                Ok(0) => {
                    info!("session {session_id}: upstream TCP connection closed by peer");
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    warn!("session {session_id}: read from upstream failed: {e}");
                    break;
                }
            }
        };

        for frame in decoder.feed(&read_tmp[..n]) {
            debug!("session {session_id}: upstream -> ws ({} bytes)", frame.len());
            if ws_tx.send(WsMessage::Binary(frame)).await.is_err() {
                debug!("session {session_id}: WebSocket closed during forwarding");
                break 'outer;
            }
        }
    }

    if !decoder.pending().is_empty() {
        debug!(
            "session {session_id}: discarding {}-byte partial frame at stream end",
            decoder.pending().len()
        );
    }

    ws_tx
}

// ── WebSocket → upstream TCP ──────────────────────────────────────────────────

/// Receives WebSocket messages and writes each one to the upstream stream
/// with the frame delimiter appended.
///
/// Text messages are normalised to their UTF-8 bytes; binary messages pass
/// through unchanged (the text/binary distinction does not survive the
/// crossing). Each write is flushed before the next message is taken, so
/// upstream backpressure stalls consumption of further WebSocket messages.
///
/// When the message sequence ends — client close, receive error, or the
/// transport simply running out — this forwarder shuts the upstream write
/// half down and fires `teardown` so the paired reader loop exits too.
pub async fn forward_ws_to_upstream(
    mut ws_rx: WsStream,
    mut write_half: OwnedWriteHalf,
    teardown: CancellationToken,
    session_id: Uuid,
) {
    debug!("session {session_id}: WebSocket receiver started");

    loop {
        let msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {session_id}: WebSocket closed by client");
                break;
            }
            Some(Err(e)) => {
                warn!("session {session_id}: WebSocket receive error: {e}");
                break;
            }
            None => {
                debug!("session {session_id}: WebSocket stream ended");
                break;
            }
        };

        if matches!(msg, WsMessage::Close(_)) {
            debug!("session {session_id}: WebSocket Close frame received");
            break;
        }

        // Protocol-level ping/pong frames; tungstenite answers pings on its
        // own the next time the sink flushes.
        let Some(payload) = message_payload(msg) else {
            continue;
        };

        debug!("session {session_id}: ws -> upstream ({} bytes)", payload.len());

        if let Err(e) = write_half.write_all(&encode_frame(&payload)).await {
            warn!("session {session_id}: write to upstream failed: {e}");
            break;
        }
        if let Err(e) = write_half.flush().await {
            warn!("session {session_id}: flush to upstream failed: {e}");
            break;
        }
    }

    // This forwarder owns upstream-writer teardown: close the write half and
    // wait for the close before signalling the reader loop.
    if let Err(e) = write_half.shutdown().await {
        debug!("session {session_id}: upstream writer shutdown failed: {e}");
    }
    teardown.cancel();

    debug!("session {session_id}: WebSocket receiver exited");
}

/// Normalises a data-bearing WebSocket message to its payload bytes.
///
/// Returns `None` for control frames (ping/pong/close) and raw frames, which
/// carry no application data for the bridge.
fn message_payload(msg: WsMessage) -> Option<Vec<u8>> {
    match msg {
        WsMessage::Text(text) => Some(text.into_bytes()),
        WsMessage::Binary(data) => Some(data),
        WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Close(_) | WsMessage::Frame(_) => {
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_normalises_to_utf8_bytes() {
        let msg = WsMessage::Text("Hello".to_string());
        assert_eq!(message_payload(msg), Some(b"Hello".to_vec()));
    }

    #[test]
    fn test_text_message_keeps_non_ascii_utf8() {
        let msg = WsMessage::Text("héllo ☂".to_string());
        assert_eq!(message_payload(msg), Some("héllo ☂".as_bytes().to_vec()));
    }

    #[test]
    fn test_binary_message_passes_through_unchanged() {
        let bytes = vec![0x00, 0xFF, 0x7F, 0x0D];
        let msg = WsMessage::Binary(bytes.clone());
        assert_eq!(message_payload(msg), Some(bytes));
    }

    #[test]
    fn test_empty_text_message_is_an_empty_payload() {
        // An empty message is still a frame: it becomes a bare delimiter on
        // the wire, not nothing.
        let msg = WsMessage::Text(String::new());
        assert_eq!(message_payload(msg), Some(Vec::new()));
    }

    #[test]
    fn test_ping_carries_no_payload() {
        assert_eq!(message_payload(WsMessage::Ping(vec![1, 2, 3])), None);
    }

    #[test]
    fn test_pong_carries_no_payload() {
        assert_eq!(message_payload(WsMessage::Pong(Vec::new())), None);
    }

    #[test]
    fn test_close_carries_no_payload() {
        assert_eq!(message_payload(WsMessage::Close(None)), None);
    }

    #[test]
    fn test_payload_gets_delimiter_appended_on_encode() {
        // The receive loop writes encode_frame(payload); spot-check the
        // composition here so the wire shape is pinned down in one place.
        let payload = message_payload(WsMessage::Text("Hello".to_string())).unwrap();
        assert_eq!(encode_frame(&payload), b"Hello\r\n");
    }
}
