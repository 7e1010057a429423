//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use hwolt_config::ConfigError;
use hwolt_core::{CliMode, CoreError, ModeKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {addr}")]
    #[diagnostic(
        code(hwolt::connection_failed),
        help(
            "Check that the OLT (or proxy) is reachable and SSH is enabled.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { addr: String, reason: String },

    #[error("SOCKS5 proxy refused the tunnel: {message} (reply: {reply})")]
    #[diagnostic(
        code(hwolt::proxy_rejected),
        help("Check --proxy (host:port) and that the proxy allows unauthenticated CONNECT.")
    )]
    ProxyRejected { message: String, reply: String },

    #[error("SSH session failed: {message}")]
    #[diagnostic(code(hwolt::ssh))]
    Ssh { message: String },

    #[error("Session closed before the command finished")]
    #[diagnostic(code(hwolt::session_closed))]
    SessionClosed,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Login failed")]
    #[diagnostic(
        code(hwolt::auth_failed),
        help(
            "The device rejected the username or password.\n\
             Run: hwolt config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(hwolt::no_credentials),
        help(
            "Store one with: hwolt config set-password --profile {profile}\n\
             Or set HWOLT_PASSWORD / the profile's password_env variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("No username configured for profile '{profile}'")]
    #[diagnostic(
        code(hwolt::no_username),
        help("Pass --username, set HWOLT_USERNAME, or run: hwolt config set username <name>")
    )]
    NoUsername { profile: String },

    // ── Usage ────────────────────────────────────────────────────────

    #[error("No OLT host given")]
    #[diagnostic(
        code(hwolt::missing_host),
        help(
            "Pass --host, set HWOLT_HOST, or create a profile with: hwolt config init\n\
             Config expected at: {path}"
        )
    )]
    MissingHost { path: String },

    #[error("`{command}` must be run in {required} mode (session is in {current} mode)")]
    #[diagnostic(
        code(hwolt::wrong_mode),
        help("Drop --enforce-modes to send it anyway.")
    )]
    WrongMode {
        command: String,
        required: ModeKind,
        current: CliMode,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hwolt::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hwolt::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hwolt::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hwolt config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hwolt::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Timed out waiting for the device")]
    #[diagnostic(
        code(hwolt::timeout),
        help("Increase --timeout, or pass --timeout 0 to wait indefinitely.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ProxyRejected { .. } | Self::Ssh { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NoUsername { .. } => {
                exit_code::AUTH
            }
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::MissingHost { .. }
            | Self::WrongMode { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { addr, reason } => {
                CliError::ConnectionFailed { addr, reason }
            }
            CoreError::ProxyRejected { message, reply } => CliError::ProxyRejected {
                message,
                reply: hwolt_core::error::hex(&reply),
            },
            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed {
                profile: "default".into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NotAuthenticated | CoreError::SessionClosed => CliError::SessionClosed,
            CoreError::WrongMode {
                command,
                required,
                current,
            } => CliError::WrongMode {
                command,
                required,
                current,
            },
            CoreError::Io(e) => CliError::Io(e),
            CoreError::Ssh { message } => CliError::Ssh { message },
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoUsername { profile } => CliError::NoUsername { profile },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failure_exits_with_auth_code() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "denied".into(),
        });
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn transport_failures_exit_with_connection_code() {
        let err = CliError::from(CoreError::ProxyRejected {
            message: "host unreachable".into(),
            reply: vec![0x05, 0x04, 0x00, 0x01],
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert!(err.to_string().contains("(reply: 05 04 00 01)"), "{err}");
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn missing_host_is_usage_error() {
        let err = CliError::MissingHost {
            path: "/tmp/none".into(),
        };
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
