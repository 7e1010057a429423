// hwolt-api: Blocking transport for Huawei OLT management (SOCKS5 tunnel + SSH shell)

pub mod auth;
pub mod channel;
pub mod error;
pub mod socks5;
pub mod transport;

pub use auth::Credentials;
pub use channel::{ShellChannel, SshChannel};
pub use error::Error;
pub use transport::{Endpoint, TransportConfig};
