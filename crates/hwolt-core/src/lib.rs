//! Session facade between `hwolt-api` and callers (CLI, scripts).
//!
//! This crate owns the device-facing logic of the workspace:
//!
//! - **[`Session`]**: Wraps one [`ShellChannel`](hwolt_api::ShellChannel)
//!   opened directly or through a SOCKS5 proxy.
//!   [`connect()`](Session::connect) logs in and clears the banner; every
//!   command method writes exactly one line and returns `&mut Self` so calls
//!   chain. A rejected login is a fatal [`CoreError`].
//!
//! - **[`CliCommand`]**: The typed catalog of OLT command lines. `Display`
//!   renders the byte-exact text the device expects; each variant knows the
//!   [`CliMode`] it runs in and the mode it leads to.
//!
//! - **[`CliMode`]**: Optimistically tracked CLI mode (user → enable →
//!   config → interface/diagnose/btv/multicast-vlan). Validation against it
//!   is opt-in via [`SessionConfig::enforce_modes`].
//!
//! String parameters (serial numbers, descriptions, filters) are written
//! verbatim. Nothing is escaped; callers must not pass text the device shell
//! would misread.

pub mod command;
pub mod config;
pub mod error;
pub mod mode;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::CliCommand;
pub use command::requests::{GponPort, OntRegistration, ServicePortRequest};
pub use config::SessionConfig;
pub use error::CoreError;
pub use mode::{CliMode, ModeKind};
pub use session::{Session, SessionState};

pub use hwolt_api::transport::DEFAULT_SSH_PORT;
pub use hwolt_api::{Credentials, Endpoint, Error as ApiError, ShellChannel};
