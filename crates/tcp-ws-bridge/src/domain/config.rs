//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup (from CLI arguments in `main.rs`, or from
//! defaults in tests) and never mutated afterwards.
//!
//! Hosts are kept as strings rather than parsed `IpAddr`s so that hostnames
//! like `"localhost"` stay valid: name resolution is left to
//! `TcpStream::connect` / `TcpListener::bind`.

/// Default host the WebSocket endpoint binds to.
pub const DEFAULT_WS_HOST: &str = "localhost";

/// Default port the WebSocket endpoint binds to.
pub const DEFAULT_WS_PORT: u16 = 5050;

/// Default read buffer size in bytes for the upstream TCP stream.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// All runtime configuration for the bridge.
///
/// Build this struct once at startup and hand it to
/// [`crate::Bridge::new`]; the bridge wraps it in an `Arc` so it can be
/// shared cheaply across all session tasks.
///
/// # Example
///
/// ```rust
/// use tcp_ws_bridge::BridgeConfig;
///
/// let cfg = BridgeConfig::new("10.0.0.5", 4242);
/// assert_eq!(cfg.tcp_addr(), "10.0.0.5:4242");
/// assert_eq!(cfg.ws_port, 5050);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Hostname or IP address of the upstream TCP endpoint.
    pub tcp_host: String,

    /// Port of the upstream TCP endpoint.
    pub tcp_port: u16,

    /// Host the WebSocket endpoint binds to.
    ///
    /// `"localhost"` accepts only local connections; bind `"0.0.0.0"` to
    /// accept clients from any interface.
    pub ws_host: String,

    /// Port the WebSocket endpoint binds to.
    ///
    /// Port `0` asks the OS for an ephemeral port; the bound address is then
    /// available from [`crate::Bridge::local_addr`].
    pub ws_port: u16,

    /// Read buffer size in bytes for the upstream TCP stream.
    pub buffer_size: usize,
}

impl BridgeConfig {
    /// Creates a configuration for the given upstream endpoint, with the
    /// default WebSocket bind address and buffer size.
    pub fn new(tcp_host: impl Into<String>, tcp_port: u16) -> Self {
        Self {
            tcp_host: tcp_host.into(),
            tcp_port,
            ws_host: DEFAULT_WS_HOST.to_string(),
            ws_port: DEFAULT_WS_PORT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// The upstream endpoint as a `"host:port"` string accepted by
    /// `TcpStream::connect`.
    pub fn tcp_addr(&self) -> String {
        format!("{}:{}", self.tcp_host, self.tcp_port)
    }

    /// The WebSocket bind address as a `"host:port"` string accepted by
    /// `TcpListener::bind`.
    pub fn ws_addr(&self) -> String {
        format!("{}:{}", self.ws_host, self.ws_port)
    }
}

impl Default for BridgeConfig {
    /// Returns a `BridgeConfig` suitable for local development without any
    /// external configuration: upstream `127.0.0.1:4242`, WebSocket endpoint
    /// on `localhost:5050`, 1024-byte read buffer.
    fn default() -> Self {
        Self::new("127.0.0.1", 4242)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
