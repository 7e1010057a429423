// ── Core error types ──
//
// User-facing errors from hwolt-core. Callers never match on SOCKS5
// bytes or libssh2 codes directly; the `From<hwolt_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::mode::{CliMode, ModeKind};

pub use hwolt_api::error::hex;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {addr}: {reason}")]
    ConnectionFailed { addr: String, reason: String },

    /// The proxy refused or garbled the CONNECT. `reply` holds the raw
    /// bytes it sent.
    #[error("SOCKS5 proxy refused the tunnel: {message} (reply: {})", hex(.reply))]
    ProxyRejected { message: String, reply: Vec<u8> },

    /// The device rejected the login. The session is unusable afterwards.
    #[error("Login failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Timed out waiting for the device")]
    Timeout,

    // ── Session state errors ─────────────────────────────────────────
    #[error("Session is not logged in; call connect() first")]
    NotAuthenticated,

    #[error("Session is closed")]
    SessionClosed,

    #[error("`{command}` requires {required} mode, session is in {current} mode")]
    WrongMode {
        command: String,
        required: ModeKind,
        current: CliMode,
    },

    // ── Channel errors ───────────────────────────────────────────────
    #[error("I/O error on the device channel: {0}")]
    Io(#[source] std::io::Error),

    #[error("SSH error: {message}")]
    Ssh { message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },
}

impl CoreError {
    /// Whether the session that produced this error must be abandoned.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hwolt_api::Error> for CoreError {
    fn from(err: hwolt_api::Error) -> Self {
        // Only I/O on an open stream; a timed-out connect is a Transport error.
        if err.is_timeout() {
            return CoreError::Timeout;
        }
        match err {
            hwolt_api::Error::Transport { addr, source } => CoreError::ConnectionFailed {
                addr,
                reason: source.to_string(),
            },
            hwolt_api::Error::Resolve { host } => CoreError::ConnectionFailed {
                addr: host,
                reason: "name did not resolve to any address".into(),
            },
            hwolt_api::Error::Protocol { message, reply } => {
                CoreError::ProxyRejected { message, reply }
            }
            hwolt_api::Error::InvalidTarget { reason } => {
                CoreError::Validation { message: reason }
            }
            hwolt_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            hwolt_api::Error::Ssh(e) => CoreError::Ssh {
                message: e.message().to_owned(),
            },
            hwolt_api::Error::ChannelClosed => CoreError::SessionClosed,
            hwolt_api::Error::Io(e) => CoreError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn only_auth_failure_is_fatal() {
        assert!(
            CoreError::AuthenticationFailed {
                message: "bad password".into()
            }
            .is_fatal()
        );
        assert!(!CoreError::NotAuthenticated.is_fatal());
        assert!(!CoreError::Timeout.is_fatal());
    }

    #[test]
    fn protocol_maps_to_proxy_rejected() {
        let err: CoreError = hwolt_api::Error::Protocol {
            message: "connection refused".into(),
            reply: vec![0x05, 0x05],
        }
        .into();
        assert!(matches!(err, CoreError::ProxyRejected { ref reply, .. } if reply == &[0x05, 0x05]));
    }

    #[test]
    fn io_timeout_maps_to_timeout() {
        let err: CoreError = hwolt_api::Error::Io(io::Error::from(io::ErrorKind::TimedOut)).into();
        assert!(matches!(err, CoreError::Timeout));
    }

    #[test]
    fn connect_timeout_keeps_the_address() {
        let err: CoreError = hwolt_api::Error::Transport {
            addr: "10.9.9.9:1080".into(),
            source: io::Error::from(io::ErrorKind::TimedOut),
        }
        .into();
        assert!(
            matches!(err, CoreError::ConnectionFailed { ref addr, .. } if addr == "10.9.9.9:1080"),
            "got {err:?}"
        );
        assert!(err.to_string().starts_with("Cannot connect to 10.9.9.9:1080"));
    }

    #[test]
    fn proxy_rejection_shows_raw_reply() {
        let err = CoreError::ProxyRejected {
            message: "host unreachable".into(),
            reply: vec![0x05, 0x04, 0x00, 0x01],
        };
        assert_eq!(
            err.to_string(),
            "SOCKS5 proxy refused the tunnel: host unreachable (reply: 05 04 00 01)"
        );
    }

    #[test]
    fn wrong_mode_message() {
        let err = CoreError::WrongMode {
            command: "ont-add".into(),
            required: ModeKind::Interface,
            current: CliMode::Config,
        };
        assert_eq!(
            err.to_string(),
            "`ont-add` requires interface mode, session is in config mode"
        );
    }
}
