use std::net::SocketAddr;

use thiserror::Error;

/// Top-level error type for the `hwolt-api` crate.
///
/// Covers every failure mode of the transport layer: opening the TCP
/// socket, the SOCKS5 handshake, the SSH session and the interactive shell.
/// `hwolt-core` maps these into session-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// TCP connection to the proxy or the OLT could not be opened.
    #[error("cannot connect to {addr}: {source}")]
    Transport {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Host name did not resolve to any socket address.
    #[error("no address found for {host}")]
    Resolve { host: String },

    // ── SOCKS5 ──────────────────────────────────────────────────────
    /// Proxy answered with something other than the expected reply.
    /// The raw reply bytes are kept for diagnosis.
    #[error("SOCKS5 protocol error: {message} (reply: {})", hex(.reply))]
    Protocol { message: String, reply: Vec<u8> },

    /// Target cannot be encoded into a SOCKS5 CONNECT request.
    #[error("invalid SOCKS5 target: {reason}")]
    InvalidTarget { reason: String },

    // ── SSH ─────────────────────────────────────────────────────────
    /// Password authentication was rejected by the device.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// SSH handshake, channel or PTY setup failed.
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    /// Shell operation attempted before login or after disconnect.
    #[error("shell channel is not open")]
    ChannelClosed,

    // ── I/O ─────────────────────────────────────────────────────────
    /// Read or write on an established stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn transport(addr: &SocketAddr, source: std::io::Error) -> Self {
        Self::Transport {
            addr: addr.to_string(),
            source,
        }
    }

    /// Returns `true` if the failure happened while reaching the remote end
    /// (proxy or OLT) rather than after the session was up.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Resolve { .. } | Self::Protocol { .. }
        )
    }

    /// Returns `true` if a read or write on an open stream timed out.
    ///
    /// A timed-out connect is a [`Error::Transport`] and does not count.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// Space-separated lowercase hex, as shown for raw SOCKS5 replies.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_shows_raw_reply() {
        let err = Error::Protocol {
            message: "method rejected".into(),
            reply: vec![0x05, 0xff],
        };
        assert_eq!(
            err.to_string(),
            "SOCKS5 protocol error: method rejected (reply: 05 ff)"
        );
    }

    #[test]
    fn timeout_detection() {
        let err = Error::Io(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert!(err.is_timeout());
        assert!(!Error::ChannelClosed.is_timeout());

        let connect = Error::Transport {
            addr: "10.9.9.9:1080".into(),
            source: std::io::Error::from(std::io::ErrorKind::TimedOut),
        };
        assert!(!connect.is_timeout());
        assert!(connect.is_connect_failure());
    }
}
