//! WebSocket endpoint: accept loop and per-session coordination.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address and reporting the
//!    outcome to the lifecycle manager.
//! 2. Accepting incoming connections and upgrading each to a WebSocket.
//! 3. Dialling the upstream TCP endpoint once per accepted session.
//! 4. Running the session's two forwarders concurrently and waiting for
//!    **both** to finish before the session counts as over.
//! 5. Closing the endpoint when the shutdown signal fires. In-flight
//!    sessions are not cancelled by shutdown — they end when their own
//!    transports close.
//!
//! Each session runs in its own Tokio task: the accept loop hands a
//! connection off and immediately returns to accepting, so one slow client
//! never delays others, and a failure inside one session never reaches its
//! neighbours or the endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::BridgeConfig;
use crate::infrastructure::upstream_conn::{
    forward_upstream_to_ws, forward_ws_to_upstream, UpstreamConnection, WsSink,
};
use crate::infrastructure::BridgeError;

// ── Endpoint runner ───────────────────────────────────────────────────────────

/// Runs the listening endpoint until the shutdown signal fires.
///
/// Binds the listener, reports the bound address (or the bind error) through
/// `ready_tx`, then accepts connections in a loop. Each accepted connection
/// is handed to a dedicated session task. Transient accept errors are logged
/// and the loop continues.
///
/// Dropping the listener on the way out is what closes the endpoint; session
/// tasks already spawned keep running.
pub(crate) async fn run_endpoint(
    config: Arc<BridgeConfig>,
    ready_tx: oneshot::Sender<Result<SocketAddr, BridgeError>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let addr = config.ws_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(source) => {
            let _ = ready_tx.send(Err(BridgeError::Bind { addr, source }));
            return;
        }
    };

    let local_addr = match listener.local_addr() {
        Ok(local_addr) => local_addr,
        Err(source) => {
            let _ = ready_tx.send(Err(BridgeError::Bind { addr, source }));
            return;
        }
    };

    info!("WebSocket endpoint listening on {local_addr}");
    if ready_tx.send(Ok(local_addr)).is_err() {
        // The lifecycle manager gave up on the start; close the endpoint again.
        return;
    }

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("shutdown signal received; closing WebSocket endpoint");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer_addr)) => {
                    let cfg = Arc::clone(&config);
                    tokio::spawn(async move {
                        handle_session(stream, peer_addr, cfg).await;
                    });
                }
                Err(e) => {
                    // Transient accept error (e.g. file-descriptor pressure).
                    error!("accept error: {e}");
                }
            }
        }
    }
}

// ── Per-session coordination ──────────────────────────────────────────────────

/// One active WebSocket-client ↔ TCP-upstream pairing.
///
/// Holds the two forwarder task handles; the transports themselves have been
/// moved into those tasks. A `Session` exists only between a successful
/// upstream dial and [`Session::join`] — it never outlives its transports.
struct Session {
    id: Uuid,
    peer_addr: SocketAddr,
    /// Upstream TCP → WebSocket forwarder; resolves to the WebSocket sink so
    /// the coordinator can close it after the join.
    tcp_to_ws: JoinHandle<WsSink>,
    /// WebSocket → upstream TCP forwarder; owns upstream-writer teardown.
    ws_to_tcp: JoinHandle<()>,
}

impl Session {
    /// Waits for **both** forwarders to finish, then closes the WebSocket.
    ///
    /// Join-all, not first-to-finish: when the client side closes, the
    /// WebSocket forwarder shuts the upstream writer down and fires the
    /// teardown token, which in turn ends the reader loop — so both handles
    /// resolve without anything being aborted. A forwarder that panicked
    /// surfaces here as a `JoinError`; it is logged and treated as the end
    /// of this session only.
    async fn join(self) {
        let Session {
            id,
            peer_addr,
            tcp_to_ws,
            ws_to_tcp,
        } = self;

        let (sink_result, ws_result) = tokio::join!(tcp_to_ws, ws_to_tcp);

        if let Err(e) = ws_result {
            error!("session {id}: WebSocket forwarder failed: {e}");
        }
        match sink_result {
            Ok(mut ws_tx) => {
                // Graceful close of the client connection; the client may
                // already be gone, which is fine.
                use futures_util::SinkExt;
                let _ = ws_tx.close().await;
            }
            Err(e) => error!("session {id}: upstream forwarder failed: {e}"),
        }

        info!("session {id}: client {peer_addr} disconnected");
    }
}

/// Top-level handler for a single WebSocket session.
///
/// Wraps [`run_session`] and logs the outcome, so `run_session` can use `?`
/// freely while errors stay contained to this session's task.
async fn handle_session(raw_stream: TcpStream, peer_addr: SocketAddr, config: Arc<BridgeConfig>) {
    let session_id = Uuid::new_v4();
    info!("session {session_id}: new WebSocket connection from {peer_addr}");

    match run_session(raw_stream, peer_addr, session_id, config).await {
        Ok(()) => info!("session {session_id}: closed normally"),
        Err(e) => warn!("session {session_id}: abandoned: {e}"),
    }
}

/// Runs the complete lifecycle of one session.
///
/// 1. Completes the WebSocket upgrade handshake.
/// 2. Dials the configured upstream TCP endpoint (suspends until it is
///    established or fails; on failure the session is abandoned and no
///    forwarder starts).
/// 3. Splits both transports and spawns the two forwarders.
/// 4. Joins both forwarders and closes the WebSocket.
///
/// # Errors
///
/// Returns [`BridgeError::Handshake`] or [`BridgeError::UpstreamConnect`];
/// both end this session alone.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    session_id: Uuid,
    config: Arc<BridgeConfig>,
) -> Result<(), BridgeError> {
    let ws_stream = accept_async(raw_stream)
        .await
        .map_err(|source| BridgeError::Handshake {
            peer: peer_addr,
            source,
        })?;

    debug!("session {session_id}: WebSocket handshake complete");

    let upstream = UpstreamConnection::connect(&config.tcp_addr()).await?;
    info!(
        "session {session_id}: connected to upstream {}",
        config.tcp_addr()
    );

    // The two forwarders share nothing but the teardown token: one gets the
    // WebSocket sink and the TCP read half, the other the WebSocket stream
    // and the TCP write half.
    use futures_util::StreamExt;
    let (ws_tx, ws_rx) = ws_stream.split();
    let teardown = CancellationToken::new();

    let session = Session {
        id: session_id,
        peer_addr,
        tcp_to_ws: tokio::spawn(forward_upstream_to_ws(
            upstream.read_half,
            ws_tx,
            config.buffer_size,
            teardown.clone(),
            session_id,
        )),
        ws_to_tcp: tokio::spawn(forward_ws_to_upstream(
            ws_rx,
            upstream.write_half,
            teardown,
            session_id,
        )),
    };

    session.join().await;
    Ok(())
}
