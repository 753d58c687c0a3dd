//! Blocking UDP endpoints pairing a socket with a session.

use std::net::SocketAddr;

use bytes::Bytes;
use tracing::{debug, instrument};

use super::config::{LinkConfig, ReceiveConfig, TransmitConfig};
use super::receiver::ReceiveTable;
use super::sender::TransmitSession;
use super::socket::SocketBinding;
use crate::protocol::{Result, WireMessage, parse_text, render_text};

/// Sending endpoint: a transmit session bound to a socket.
#[derive(Debug)]
pub struct Sender {
    socket: SocketBinding,
    session: TransmitSession,
}

impl Sender {
    /// Bind a sender with a fresh session.
    #[instrument(level = "info", skip(link, session))]
    pub fn bind(addr: SocketAddr, link: &LinkConfig, session: TransmitConfig) -> Result<Self> {
        Ok(Self {
            socket: SocketBinding::bind(addr, link)?,
            session: TransmitSession::new(session),
        })
    }

    /// Append a message and send the resulting window.
    #[instrument(level = "trace", skip(self, message))]
    pub fn send(&mut self, message: impl Into<WireMessage>, to: SocketAddr) -> Result<usize> {
        let packet = self.session.send(message);
        self.socket.send_to(&packet, to)
    }

    /// Re-send the current window without appending.
    pub fn resend(&self, to: SocketAddr) -> Result<usize> {
        self.socket.send_to(&self.session.snapshot_packet(), to)
    }

    /// Send raw bytes in the `MIDI XX ..` text form, bypassing the session.
    #[instrument(level = "trace", skip(self, bytes))]
    pub fn send_text(&self, bytes: &[u8], to: SocketAddr) -> Result<usize> {
        self.socket.send_to(render_text(bytes).as_bytes(), to)
    }

    /// Session accessor.
    #[must_use]
    pub const fn session(&self) -> &TransmitSession {
        &self.session
    }

    /// Socket accessor.
    #[must_use]
    pub const fn socket(&self) -> &SocketBinding {
        &self.socket
    }
}

/// Receiving endpoint: a receive table bound to a socket.
#[derive(Debug)]
pub struct Receiver {
    socket: SocketBinding,
    table: ReceiveTable,
    buffer: Vec<u8>,
}

impl Receiver {
    /// Bind a receiver with an empty table.
    #[instrument(level = "info", skip(link, table))]
    pub fn bind(addr: SocketAddr, link: &LinkConfig, table: ReceiveConfig) -> Result<Self> {
        Ok(Self {
            socket: SocketBinding::bind(addr, link)?,
            table: ReceiveTable::new(table),
            buffer: vec![0u8; link.buffer_size.max(1)],
        })
    }

    /// Block for one datagram and reconcile it.
    ///
    /// Malformed datagrams come back as errors; the caller may keep receiving.
    #[instrument(level = "trace", skip(self))]
    pub fn recv(&mut self) -> Result<(Vec<WireMessage>, SocketAddr)> {
        let (len, from) = self.socket.recv_from(&mut self.buffer)?;
        let datagram = Bytes::copy_from_slice(&self.buffer[..len]);
        match self.table.ingest(&datagram) {
            Ok(messages) => Ok((messages, from)),
            Err(err) => {
                debug!(%from, error = %err, "rejected datagram");
                Err(err)
            }
        }
    }

    /// Block for one `MIDI XX ..` text datagram.
    #[instrument(level = "trace", skip(self))]
    pub fn recv_text(&mut self) -> Result<(Vec<u8>, SocketAddr)> {
        let (len, from) = self.socket.recv_from(&mut self.buffer)?;
        Ok((parse_text(&self.buffer[..len])?, from))
    }

    /// Receive table accessor.
    #[must_use]
    pub const fn table(&self) -> &ReceiveTable {
        &self.table
    }

    /// Mutable receive table accessor (for pruning).
    pub fn table_mut(&mut self) -> &mut ReceiveTable {
        &mut self.table
    }

    /// Socket accessor.
    #[must_use]
    pub const fn socket(&self) -> &SocketBinding {
        &self.socket
    }
}
