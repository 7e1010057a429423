// ── Runtime session configuration ──
//
// These types describe *how* to reach one OLT. They carry credentials and
// connection tuning but never touch disk; the CLI builds a `SessionConfig`
// from its profile and hands it in.

use std::time::Duration;

use hwolt_api::{Credentials, Endpoint, TransportConfig};

/// Channel timeout applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Configuration for a session with a single OLT.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// OLT management address (SSH port, usually 22).
    pub target: Endpoint,
    pub credentials: Credentials,
    /// Channel read/write timeout. `None` blocks until the first output
    /// arrives.
    pub timeout: Option<Duration>,
    /// Echo every sent line to the debug sink as `[Debug] <line>`.
    pub debug: bool,
    /// SOCKS5 proxy to tunnel the SSH connection through.
    pub proxy: Option<Endpoint>,
    /// Reject commands sent outside their CLI mode instead of writing them.
    pub enforce_modes: bool,
}

impl SessionConfig {
    pub fn new(target: Endpoint, credentials: Credentials) -> Self {
        Self {
            target,
            credentials,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            debug: false,
            proxy: None,
            enforce_modes: false,
        }
    }

    /// Set the timeout in whole seconds; `0` disables it.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<Endpoint>) -> Self {
        self.proxy = proxy;
        self
    }

    #[must_use]
    pub fn with_enforce_modes(mut self, enforce: bool) -> Self {
        self.enforce_modes = enforce;
        self
    }

    /// How the TCP stream under the SSH session is opened.
    pub fn transport(&self) -> TransportConfig {
        let transport = TransportConfig::direct(self.timeout);
        match &self.proxy {
            Some(proxy) => transport.with_proxy(proxy.clone()),
            None => transport,
        }
    }
}
