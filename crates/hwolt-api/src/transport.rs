// Transport configuration and TCP socket setup.
//
// The SSH channel always runs over a plain `TcpStream`: either dialled
// directly at the OLT or handed back by the SOCKS5 tunnel. Both paths
// share the endpoint type and resolution logic defined here.

use std::fmt;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::socks5;

/// Default SSH port on Huawei OLT management interfaces.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connect timeout for direct connections when the session timeout is disabled.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A `host:port` pair naming the OLT or the SOCKS5 proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Build an endpoint, rejecting an empty host and port 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, Error> {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::InvalidTarget {
                reason: "host is empty".into(),
            });
        }
        if port == 0 {
            return Err(Error::InvalidTarget {
                reason: format!("port must be 1-65535 for {host}"),
            });
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to every socket address the host maps to.
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, Error> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| Error::Resolve {
                host: self.host.clone(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(Error::Resolve {
                host: self.host.clone(),
            });
        }
        Ok(addrs)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Parse `host:port` or `[v6addr]:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidTarget {
            reason: format!("'{s}': {reason}"),
        };
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected host:port"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;
        Self::new(host, port)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

/// How the TCP stream underneath the SSH session is obtained.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Connect timeout for direct connections. `None` falls back to
    /// [`DEFAULT_CONNECT_TIMEOUT`]. The SOCKS5 path always uses its own
    /// fixed timeout.
    pub connect_timeout: Option<Duration>,
    /// SOCKS5 proxy to tunnel through, if any.
    pub proxy: Option<Endpoint>,
}

impl TransportConfig {
    /// Config for a direct connection.
    pub fn direct(connect_timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            proxy: None,
        }
    }

    /// Tunnel through the given SOCKS5 proxy.
    pub fn with_proxy(mut self, proxy: Endpoint) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Open a raw TCP stream to `target`, directly or via the proxy.
    pub fn open(&self, target: &Endpoint) -> Result<TcpStream, Error> {
        match &self.proxy {
            Some(proxy) => {
                debug!(%proxy, %target, "opening tunnel through SOCKS5 proxy");
                socks5::connect(proxy, target)
            }
            None => {
                debug!(%target, "opening direct connection");
                connect_tcp(
                    target,
                    self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
                )
            }
        }
    }
}

/// Try every resolved address in turn, returning the first that connects.
pub(crate) fn connect_tcp(endpoint: &Endpoint, timeout: Duration) -> Result<TcpStream, Error> {
    let mut last_err = None;
    for addr in endpoint.socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(Error::transport(&addr, e));
            }
        }
    }
    Err(last_err.unwrap_or_else(|| Error::Resolve {
        host: endpoint.host.clone(),
    }))
}
