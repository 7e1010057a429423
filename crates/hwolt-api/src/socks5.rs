//! SOCKS5 tunnel establisher (RFC 1928, CONNECT only, no authentication).
//!
//! Opens a TCP connection to the proxy, negotiates the "no authentication"
//! method, and asks the proxy to CONNECT to the OLT using the domain-name
//! address type. The returned stream is positioned right after the proxy's
//! reply so the SSH handshake can start on it immediately.
//!
//! Wire sequence:
//!
//! ```text
//! -> 05 01 00                              greeting, 1 method: no-auth
//! <- 05 00                                 method accepted
//! -> 05 01 00 03 <len> <host> <port BE>    CONNECT, ATYP = domain name
//! <- 05 00 00 <atyp> <bound addr> <port>   success
//! ```

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, TcpStream};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::transport::{Endpoint, connect_tcp};

pub const SOCKS5_VERSION: u8 = 0x05;

pub const METHOD_NO_AUTH: u8 = 0x00;
pub const METHOD_NO_ACCEPTABLE: u8 = 0xFF;

pub const CMD_CONNECT: u8 = 0x01;
pub const RESERVED: u8 = 0x00;

pub const ATYP_IPV4: u8 = 0x01;
pub const ATYP_DOMAIN: u8 = 0x03;
pub const ATYP_IPV6: u8 = 0x04;

pub const REPLY_SUCCEEDED: u8 = 0x00;

/// Fixed connect timeout for the proxy socket.
pub const PROXY_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Read/write timeout applied only while the handshake is in flight.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Greeting offering a single method: no authentication.
pub const GREETING: [u8; 3] = [SOCKS5_VERSION, 1, METHOD_NO_AUTH];

/// Human-readable text for a CONNECT reply code.
pub const fn reply_message(code: u8) -> &'static str {
    match code {
        0x00 => "succeeded",
        0x01 => "general SOCKS server failure",
        0x02 => "connection not allowed by ruleset",
        0x03 => "network unreachable",
        0x04 => "host unreachable",
        0x05 => "connection refused",
        0x06 => "TTL expired",
        0x07 => "command not supported",
        0x08 => "address type not supported",
        _ => "unknown error",
    }
}

/// Address the proxy reports having bound for the relayed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundAddress {
    Ipv4(Ipv4Addr, u16),
    Ipv6(Ipv6Addr, u16),
    Domain(String, u16),
}

impl fmt::Display for BoundAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(ip, port) => write!(f, "{ip}:{port}"),
            Self::Ipv6(ip, port) => write!(f, "[{ip}]:{port}"),
            Self::Domain(host, port) => write!(f, "{host}:{port}"),
        }
    }
}

/// Encode the CONNECT request for `target`.
///
/// Layout: `05 01 00 03 <len> <host bytes> <port big-endian>`.
pub fn connect_request(target: &Endpoint) -> Result<Vec<u8>, Error> {
    let host = target.host().as_bytes();
    let len = u8::try_from(host.len()).map_err(|_| Error::InvalidTarget {
        reason: format!("host name is {} bytes, SOCKS5 allows 255", host.len()),
    })?;

    let mut request = Vec::with_capacity(7 + host.len());
    request.extend_from_slice(&[SOCKS5_VERSION, CMD_CONNECT, RESERVED, ATYP_DOMAIN, len]);
    request.extend_from_slice(host);
    request.extend_from_slice(&target.port().to_be_bytes());
    Ok(request)
}

/// Dial `proxy` and negotiate a tunnel to `target`.
///
/// No retries: any failed step drops the socket and returns the error.
pub fn connect(proxy: &Endpoint, target: &Endpoint) -> Result<TcpStream, Error> {
    // Encode first so an unusable target never touches the network.
    let request = connect_request(target)?;

    let mut stream = connect_tcp(proxy, PROXY_CONNECT_TIMEOUT)?;
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;
    stream.set_write_timeout(Some(HANDSHAKE_TIMEOUT))?;

    let bound = negotiate_request(&mut stream, &request)?;
    debug!(%proxy, %target, %bound, "SOCKS5 tunnel established");

    stream.set_read_timeout(None)?;
    stream.set_write_timeout(None)?;
    Ok(stream)
}

/// Run the handshake over an already-connected stream.
pub fn negotiate<S: Read + Write>(stream: &mut S, target: &Endpoint) -> Result<BoundAddress, Error> {
    let request = connect_request(target)?;
    negotiate_request(stream, &request)
}

fn negotiate_request<S: Read + Write>(
    stream: &mut S,
    request: &[u8],
) -> Result<BoundAddress, Error> {
    trace!(bytes = ?GREETING, "SOCKS5 greeting");
    stream.write_all(&GREETING)?;
    stream.flush()?;

    let reply = read_reply(stream, 2, "method selection")?;
    if reply != [SOCKS5_VERSION, METHOD_NO_AUTH] {
        let message = if reply.get(1) == Some(&METHOD_NO_ACCEPTABLE) {
            "proxy accepted none of the offered methods".to_owned()
        } else {
            "unsupported protocol or unsupported method".to_owned()
        };
        warn!(?reply, "SOCKS5 method selection refused");
        return Err(Error::Protocol { message, reply });
    }

    trace!(bytes = ?request, "SOCKS5 CONNECT request");
    stream.write_all(request)?;
    stream.flush()?;

    read_connect_reply(stream)
}

/// Parse the CONNECT reply structurally: 4-byte header, then the bound
/// address sized by its own address type, then the port.
fn read_connect_reply<S: Read>(stream: &mut S) -> Result<BoundAddress, Error> {
    let header = read_reply(stream, 4, "CONNECT")?;
    let (version, code, atyp) = (header[0], header[1], header[3]);

    if version != SOCKS5_VERSION || code != REPLY_SUCCEEDED {
        let message = if version == SOCKS5_VERSION {
            format!("connection refused by proxy: {}", reply_message(code))
        } else {
            "unsupported protocol or connection refused".to_owned()
        };
        warn!(reply = ?header, "SOCKS5 CONNECT refused");
        return Err(Error::Protocol {
            message,
            reply: header,
        });
    }

    let with_header = |rest: Vec<u8>| {
        let mut all = header.clone();
        all.extend_from_slice(&rest);
        all
    };

    match atyp {
        ATYP_IPV4 => {
            let rest = read_reply(stream, 6, "CONNECT").map_err(|e| prefix_reply(e, &header))?;
            let ip = Ipv4Addr::new(rest[0], rest[1], rest[2], rest[3]);
            Ok(BoundAddress::Ipv4(ip, port_of(&rest[4..])))
        }
        ATYP_IPV6 => {
            let rest = read_reply(stream, 18, "CONNECT").map_err(|e| prefix_reply(e, &header))?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(&rest[..16]);
            Ok(BoundAddress::Ipv6(Ipv6Addr::from(octets), port_of(&rest[16..])))
        }
        ATYP_DOMAIN => {
            let len = read_reply(stream, 1, "CONNECT").map_err(|e| prefix_reply(e, &header))?;
            let n = usize::from(len[0]);
            let rest = read_reply(stream, n + 2, "CONNECT").map_err(|e| {
                let mut seen = header.clone();
                seen.push(len[0]);
                prefix_reply(e, &seen)
            })?;
            let host = String::from_utf8_lossy(&rest[..n]).into_owned();
            Ok(BoundAddress::Domain(host, port_of(&rest[n..])))
        }
        other => Err(Error::Protocol {
            message: format!("unknown address type 0x{other:02x} in CONNECT reply"),
            reply: with_header(Vec::new()),
        }),
    }
}

/// Read exactly `len` bytes; a short read becomes a protocol error carrying
/// whatever did arrive.
fn read_reply<S: Read>(stream: &mut S, len: usize, stage: &str) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => {
                buf.truncate(filled);
                return Err(Error::Protocol {
                    message: format!("proxy closed the connection during {stage} reply"),
                    reply: buf,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(buf)
}

fn prefix_reply(err: Error, seen: &[u8]) -> Error {
    match err {
        Error::Protocol { message, reply } => {
            let mut all = seen.to_vec();
            all.extend_from_slice(&reply);
            Error::Protocol {
                message,
                reply: all,
            }
        }
        other => other,
    }
}

fn port_of(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}
