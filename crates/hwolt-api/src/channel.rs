// Interactive shell channel over SSH.
//
// `ShellChannel` is the seam between the session facade and the SSH
// implementation. Production code uses `SshChannel` (libssh2 via the `ssh2`
// crate); tests substitute a recording double.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, trace};

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::{Endpoint, TransportConfig};

/// Terminal type requested for the interactive shell.
const PTY_TERM: &str = "vt100";

/// Wide PTY so long `display` tables wrap less on the device side.
const PTY_WIDTH: u32 = 512;
const PTY_HEIGHT: u32 = 24;

const READ_CHUNK: usize = 4096;

/// A blocking, line-oriented remote shell.
///
/// Implementations own the underlying transport. Every call blocks the
/// calling thread; a channel is not meant to be shared between threads.
pub trait ShellChannel {
    /// Authenticate and open the interactive shell.
    ///
    /// Rejected credentials must surface as [`Error::Authentication`].
    fn login(&mut self, credentials: &Credentials) -> Result<(), Error>;

    /// Write raw bytes to the shell, returning how many were written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Error>;

    /// Return the next chunk of available output.
    fn read(&mut self) -> Result<Vec<u8>, Error>;

    /// Timeout for channel reads and writes. `None` blocks indefinitely.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// Close the shell and the SSH session.
    fn disconnect(&mut self) -> Result<(), Error>;
}

/// [`ShellChannel`] backed by a libssh2 session.
pub struct SshChannel {
    session: ssh2::Session,
    shell: Option<ssh2::Channel>,
    timeout: Option<Duration>,
}

impl SshChannel {
    /// Run the SSH handshake over an already-connected stream
    /// (direct socket or SOCKS5 tunnel).
    ///
    /// `timeout` bounds the handshake as well as later channel I/O, so a
    /// peer that never sends its banner fails instead of hanging.
    pub fn handshake(stream: TcpStream, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut session = ssh2::Session::new()?;
        session.set_tcp_stream(stream);
        let timeout = timeout.filter(|t| !t.is_zero());
        session.set_timeout(libssh2_millis(timeout));
        session.handshake()?;
        debug!(banner = session.banner().unwrap_or("-"), "SSH handshake complete");
        Ok(Self {
            session,
            shell: None,
            timeout,
        })
    }

    /// Open the transport described by `transport` and handshake over it.
    pub fn connect(
        target: &Endpoint,
        transport: &TransportConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let stream = transport.open(target)?;
        Self::handshake(stream, timeout)
    }

    fn shell(&mut self) -> Result<&mut ssh2::Channel, Error> {
        self.shell.as_mut().ok_or(Error::ChannelClosed)
    }
}

impl ShellChannel for SshChannel {
    fn login(&mut self, credentials: &Credentials) -> Result<(), Error> {
        debug!(username = credentials.username(), "authenticating");
        if let Err(e) = self
            .session
            .userauth_password(credentials.username(), credentials.expose_password())
        {
            return Err(Error::Authentication {
                message: e.message().to_owned(),
            });
        }
        if !self.session.authenticated() {
            return Err(Error::Authentication {
                message: "password rejected".into(),
            });
        }

        let mut channel = self.session.channel_session()?;
        channel.request_pty(PTY_TERM, None, Some((PTY_WIDTH, PTY_HEIGHT, 0, 0)))?;
        channel.shell()?;
        self.shell = Some(channel);

        debug!("interactive shell open");
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        let shell = self.shell()?;
        shell.write_all(data)?;
        shell.flush()?;
        trace!(len = data.len(), "wrote to shell");
        Ok(data.len())
    }

    /// Gather output until the channel goes quiet for one timeout period.
    ///
    /// With no timeout set, returns as soon as the first chunk arrives.
    fn read(&mut self) -> Result<Vec<u8>, Error> {
        let wait_for_quiet = self.timeout.is_some();
        let shell = self.shell()?;

        let mut out = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match shell.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    out.extend_from_slice(&buf[..n]);
                    if !wait_for_quiet {
                        break;
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        trace!(len = out.len(), "read from shell");
        Ok(out)
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self.session.set_timeout(libssh2_millis(self.timeout));
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        if let Some(mut shell) = self.shell.take() {
            // Best effort: the device may already have closed its side.
            let _ = shell.send_eof();
            let _ = shell.close();
        }
        self.session.disconnect(None, "closed by client", None)?;
        debug!("SSH session closed");
        Ok(())
    }
}

/// libssh2 takes milliseconds, 0 meaning "block forever".
fn libssh2_millis(timeout: Option<Duration>) -> u32 {
    timeout.map_or(0, |t| u32::try_from(t.as_millis()).unwrap_or(u32::MAX))
}
