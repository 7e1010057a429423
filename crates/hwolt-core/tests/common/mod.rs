// Shared test doubles for session tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use hwolt_api::{Credentials, Endpoint, Error, ShellChannel};
use hwolt_core::{Session, SessionConfig};

/// Records everything written and replays canned output.
#[derive(Debug, Default)]
pub struct MockChannel {
    pub written: Vec<u8>,
    pub logins: Vec<String>,
    pub output: VecDeque<Vec<u8>>,
    pub reject_login: bool,
    pub timeout: Option<Duration>,
    pub disconnects: usize,
}

impl MockChannel {
    pub fn with_output(chunks: &[&str]) -> Self {
        Self {
            output: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
            ..Self::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject_login: true,
            ..Self::default()
        }
    }

    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

impl ShellChannel for MockChannel {
    fn login(&mut self, credentials: &Credentials) -> Result<(), Error> {
        self.logins.push(credentials.username().to_owned());
        if self.reject_login {
            return Err(Error::Authentication {
                message: "password rejected".into(),
            });
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self) -> Result<Vec<u8>, Error> {
        Ok(self.output.pop_front().unwrap_or_default())
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        self.disconnects += 1;
        Ok(())
    }
}

/// Cloneable in-memory debug sink.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn config() -> SessionConfig {
    SessionConfig::new(
        Endpoint::new("192.168.100.1", 22).unwrap(),
        Credentials::new("root", "admin123".to_owned()),
    )
}

/// A logged-in session over a mock whose banner has already been consumed.
pub fn logged_in(config: SessionConfig) -> (Session<MockChannel>, SharedBuf) {
    let sink = SharedBuf::default();
    let mut session = Session::with_channel(config, MockChannel::with_output(&["Welcome\r\nMA5800>"]))
        .with_debug_sink(sink.clone());
    session.connect().unwrap();
    (session, sink)
}
