//! Bridge lifecycle manager: an explicit Idle/Running state machine around
//! the endpoint-runner task.
//!
//! [`Bridge`] owns the listening endpoint's handle — the bound address, the
//! shutdown signal, and the runner task — as one `ServerHandle` value, so
//! `start`/`stop` idempotence reduces to "is there a live handle".
//!
//! Neither `start` nor `stop` returns an error: an endpoint that failed to
//! bind is logged and leaves the bridge `Idle`, and the only observables are
//! the logs and [`Bridge::is_running`]. `stop` closes the listening endpoint
//! and waits for the runner to finish; sessions already in flight are left
//! to drain on their own.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::{BridgeConfig, BridgeState};
use crate::infrastructure::ws_server;

/// The running listening endpoint and its background task.
///
/// Created by [`Bridge::start`], torn down by [`Bridge::stop`].
struct ServerHandle {
    /// Address the endpoint actually bound (relevant with port 0).
    local_addr: SocketAddr,
    /// Signal that tells the runner to close the endpoint.
    shutdown_tx: watch::Sender<bool>,
    /// The endpoint-runner task.
    task: JoinHandle<()>,
}

/// The bridge: accepts WebSocket clients and relays each one to the
/// configured upstream TCP endpoint.
///
/// # Example
///
/// ```no_run
/// use tcp_ws_bridge::{Bridge, BridgeConfig};
///
/// # async fn example() {
/// let mut bridge = Bridge::new(BridgeConfig::new("127.0.0.1", 4242));
/// bridge.start().await;
/// assert!(bridge.is_running());
/// bridge.stop().await;
/// # }
/// ```
pub struct Bridge {
    config: Arc<BridgeConfig>,
    state: BridgeState,
    server: Option<ServerHandle>,
}

impl Bridge {
    /// Creates an idle bridge for the given configuration.
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: BridgeState::Idle,
            server: None,
        }
    }

    /// The configuration this bridge was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The lifecycle state recorded by the last `start`/`stop` transition.
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Whether the listening endpoint is up.
    ///
    /// `Running` state alone is not enough: the runner task must also still
    /// be alive, so a bridge whose endpoint task died reads as not running
    /// (and a subsequent [`Bridge::start`] will start a fresh one).
    pub fn is_running(&self) -> bool {
        self.state == BridgeState::Running
            && self
                .server
                .as_ref()
                .is_some_and(|handle| !handle.task.is_finished())
    }

    /// The address the endpoint is bound to, while running.
    ///
    /// With `ws_port = 0` this is where the OS-assigned port shows up.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(|handle| handle.local_addr)
    }

    /// Starts the listening endpoint.
    ///
    /// No-op when the endpoint is already running. Otherwise spawns the
    /// runner task and suspends until it has either bound the listener or
    /// failed to; a bind failure is logged and leaves the bridge `Idle`.
    /// It is not retried and not surfaced as an error.
    pub async fn start(&mut self) {
        if self.is_running() {
            debug!("start ignored: bridge already running");
            return;
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(ws_server::run_endpoint(
            Arc::clone(&self.config),
            ready_tx,
            shutdown_rx,
        ));

        match ready_rx.await {
            Ok(Ok(local_addr)) => {
                info!(
                    "bridge started: ws {local_addr} -> tcp {}",
                    self.config.tcp_addr()
                );
                self.server = Some(ServerHandle {
                    local_addr,
                    shutdown_tx,
                    task,
                });
                self.state = BridgeState::Running;
            }
            Ok(Err(e)) => {
                error!("bridge failed to start: {e}");
                let _ = task.await;
                self.server = None;
                self.state = BridgeState::Idle;
            }
            Err(_) => {
                // The runner died before reporting readiness; surface the
                // join error (a panic message) in the logs.
                if let Err(e) = task.await {
                    error!("endpoint task failed during startup: {e}");
                }
                self.server = None;
                self.state = BridgeState::Idle;
            }
        }
    }

    /// Stops the listening endpoint and waits for the runner task to finish.
    ///
    /// Idempotent: on an already-idle bridge this only clears the handles.
    /// In-flight sessions are not cancelled — they end when their own
    /// transports close.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.server.take() {
            let _ = handle.shutdown_tx.send(true);
            match handle.task.await {
                Ok(()) => info!("bridge stopped"),
                Err(e) => error!("endpoint task failed during shutdown: {e}"),
            }
        }
        self.state = BridgeState::Idle;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
