//! UDP socket carrying session or text datagrams.

use std::net::{SocketAddr, UdpSocket};

use tracing::debug;

use super::config::LinkConfig;
use crate::protocol::Result;

/// Blocking UDP socket configured from a [`LinkConfig`].
#[derive(Debug)]
pub struct SocketBinding {
    socket: UdpSocket,
}

impl SocketBinding {
    /// Bind to `addr`, apply timeouts and multicast options, and join every
    /// configured multicast group.
    pub fn bind(addr: SocketAddr, config: &LinkConfig) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(config.read_timeout)?;
        socket.set_write_timeout(config.write_timeout)?;
        if addr.is_ipv4() {
            socket.set_multicast_loop_v4(config.multicast_loop)?;
        }
        for group in &config.multicast_groups {
            socket.join_multicast_v4(group, &config.multicast_interface)?;
            debug!(%group, interface = %config.multicast_interface, "joined multicast group");
        }
        Ok(Self { socket })
    }

    /// Send one datagram.
    pub fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        Ok(self.socket.send_to(buf, addr)?)
    }

    /// Block for one datagram. Bytes past `buf.len()` are discarded by the OS.
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        Ok(self.socket.recv_from(buf)?)
    }

    /// Local address, including the port picked for `:0` binds.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::protocol::Error;

    fn any_port() -> SocketAddr {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    }

    #[test]
    fn joins_configured_group() {
        let config = LinkConfig {
            multicast_groups: vec![Ipv4Addr::new(239, 255, 77, 1)],
            multicast_interface: Ipv4Addr::LOCALHOST,
            ..LinkConfig::default()
        };
        let socket = SocketBinding::bind(any_port(), &config).unwrap();
        assert_ne!(socket.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn unicast_group_is_rejected() {
        let config = LinkConfig {
            multicast_groups: vec![Ipv4Addr::new(10, 0, 0, 1)],
            multicast_interface: Ipv4Addr::LOCALHOST,
            ..LinkConfig::default()
        };
        assert!(matches!(
            SocketBinding::bind(any_port(), &config),
            Err(Error::Io(_))
        ));
    }
}
