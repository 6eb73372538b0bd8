use crate::mac;
use crate::mac::HardwareAddress;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

pub const DEFAULT_PORT: u16 = 9;
pub const PACKET_LEN: usize = SYNCHRONIZATION_SCHEME.len() + 16 * 6;

const SYNCHRONIZATION_SCHEME: [u8; 6] = [0xff; 6];

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error(transparent)]
    Mac(#[from] mac::ParseError),
    #[error("could not resolve {target}: {source}")]
    Resolve { target: String, source: io::Error },
    #[error("{target} resolved to no addresses")]
    NoAddress { target: String },
    #[error("could not send magic packet: {0}")]
    Transmit(#[from] io::Error),
    #[error("magic packet truncated to {written} bytes")]
    ShortWrite { written: usize },
}

/// The 102 byte Wake-on-LAN payload: six `0xff` followed by the target
/// address sixteen times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicPacket([u8; PACKET_LEN]);

impl MagicPacket {
    pub fn new(mac_address: HardwareAddress) -> Self {
        let mut data = [0u8; PACKET_LEN];
        data[..SYNCHRONIZATION_SCHEME.len()].copy_from_slice(&SYNCHRONIZATION_SCHEME);
        for block in data[SYNCHRONIZATION_SCHEME.len()..].chunks_exact_mut(6) {
            block.copy_from_slice(mac_address.as_ref());
        }
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }
}

pub fn port_or_default(port: u16) -> u16 {
    if port == 0 {
        DEFAULT_PORT
    } else {
        port
    }
}

/// Resolves `host` on every call; nothing is cached between sends.
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr, SendError> {
    let target = join_host_port(host, port);
    let mut addrs = (host_literal(host), port)
        .to_socket_addrs()
        .map_err(|source| SendError::Resolve {
            target: target.clone(),
            source,
        })?;
    addrs.next().ok_or(SendError::NoAddress { target })
}

/// Sends one magic packet for `mac_address` to `host:port` over unicast UDP.
/// A port of 0 means the well known discard port 9.
pub fn send(mac_address: &str, host: &str, port: u16) -> Result<SocketAddr, SendError> {
    let packet = MagicPacket::new(mac::parse(mac_address)?);
    let addr = resolve(host, port_or_default(port))?;

    let socket = match addr {
        SocketAddr::V4(_) => UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?,
        SocketAddr::V6(_) => UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0))?,
    };
    socket.connect(addr)?;
    let written = socket.send(packet.as_bytes())?;
    if written != PACKET_LEN {
        return Err(SendError::ShortWrite { written });
    }
    Ok(addr)
}

// Accepts "[::1]" as well as "::1".
pub(crate) fn host_literal(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

fn join_host_port(host: &str, port: u16) -> String {
    let host = host_literal(host);
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use crate::wol::*;
    use std::time::Duration;

    const MAC: [u8; 6] = [0x10, 0xff, 0xe0, 0xcf, 0xe6, 0x0e];

    #[test]
    fn test_packet_layout() {
        let packet = MagicPacket::new(HardwareAddress::new(MAC));
        let bytes = packet.as_bytes();
        assert_eq!(bytes.len(), 102);
        assert_eq!(bytes[..6], [0xffu8; 6]);
        for i in 0..16 {
            assert_eq!(bytes[6 + 6 * i..12 + 6 * i], MAC, "block {i}");
        }
    }

    #[test]
    fn test_packet_all_ones_address() {
        let packet = MagicPacket::new(HardwareAddress::new([0xff; 6]));
        assert_eq!(packet.as_bytes(), &[0xffu8; 102]);
    }

    #[test]
    fn test_port_or_default() {
        assert_eq!(port_or_default(0), 9);
        for port in [1, 7, 9, 40000, 65535] {
            assert_eq!(port_or_default(port), port);
        }
    }

    #[test]
    fn test_join_host_port() {
        assert_eq!(join_host_port("123.123.1.3", 9), "123.123.1.3:9");
        assert_eq!(join_host_port("::1", 9), "[::1]:9");
        assert_eq!(join_host_port("[fe80::1]", 7), "[fe80::1]:7");
        assert_eq!(join_host_port("nas.lan", 9), "nas.lan:9");
    }

    #[test]
    fn test_host_literal_strips_one_pair() {
        assert_eq!(host_literal("[::1]"), "::1");
        assert_eq!(host_literal("::1"), "::1");
        assert_eq!(host_literal("[[::1]]"), "[::1]");
        assert_eq!(host_literal("[::1"), "[::1");
    }

    #[test]
    fn test_resolve_literal() {
        assert_eq!(
            resolve("123.123.1.3", port_or_default(0)).unwrap(),
            "123.123.1.3:9".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve("[::1]", 7).unwrap(),
            "[::1]:7".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_send_delivers_packet() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let addr = send("10:ff:e0:cf:e6:0e", "127.0.0.1", port).unwrap();
        assert_eq!(addr, listener.local_addr().unwrap());

        let mut buf = [0u8; 512];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(len, PACKET_LEN);
        assert_eq!(&buf[..len], MagicPacket::new(HardwareAddress::new(MAC)).as_bytes());
    }

    #[test]
    fn test_send_bad_mac_skips_network() {
        // The host is never looked up, so an unresolvable name still yields a MAC error.
        let err = send("not-a-mac", "host.invalid", 0).unwrap_err();
        assert!(matches!(err, SendError::Mac(_)), "{err:?}");
    }

    #[test]
    fn test_send_unresolvable_host() {
        let err = send("10:ff:e0:cf:e6:0e", "host.invalid", 0).unwrap_err();
        assert!(
            matches!(err, SendError::Resolve { .. } | SendError::NoAddress { .. }),
            "{err:?}"
        );
    }
}
