//! Transmit session: history window, source identifier and sequence counter.

use std::collections::VecDeque;

use bytes::Bytes;
use tracing::trace;
use uuid::Uuid;

use super::config::TransmitConfig;
use super::packet::{Packet, encode_parts};
use crate::protocol::WireMessage;

/// Sender side of a loss-tolerant session.
///
/// Every packet carries the whole history window, so a receiver that misses
/// a datagram recovers the lost messages from the next one.
#[derive(Debug, Clone)]
pub struct TransmitSession {
    source: Uuid,
    sequence: u8,
    capacity: usize,
    window: VecDeque<WireMessage>,
}

impl TransmitSession {
    /// Create a session with a fresh random source identifier.
    #[must_use]
    pub fn new(config: TransmitConfig) -> Self {
        Self::with_source(Uuid::new_v4(), config)
    }

    /// Create a session with an explicit source identifier.
    #[must_use]
    pub fn with_source(source: Uuid, config: TransmitConfig) -> Self {
        let capacity = config.window_capacity.max(1);
        Self {
            source,
            sequence: 0,
            capacity,
            window: VecDeque::with_capacity(capacity),
        }
    }

    /// Record an outgoing message.
    ///
    /// Advances the sequence counter by one (wrapping) and evicts the oldest
    /// window entry once the window is full.
    pub fn append(&mut self, message: impl Into<WireMessage>) {
        self.sequence = self.sequence.wrapping_add(1);
        if self.window.len() >= self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(message.into());
        trace!(
            source = %self.source,
            sequence = self.sequence,
            window = self.window.len(),
            "appended message"
        );
    }

    /// Encode the current window as a datagram payload.
    #[must_use]
    pub fn snapshot_packet(&self) -> Bytes {
        encode_parts(self.source, self.sequence, &self.window)
    }

    /// Copy the current window into a [`Packet`].
    #[must_use]
    pub fn snapshot(&self) -> Packet {
        Packet::new(
            self.source,
            self.sequence,
            self.window.iter().cloned().collect(),
        )
    }

    /// Append a message and snapshot the window that now includes it.
    pub fn send(&mut self, message: impl Into<WireMessage>) -> Bytes {
        self.append(message);
        self.snapshot_packet()
    }

    /// Source identifier accessor.
    #[must_use]
    pub const fn source(&self) -> Uuid {
        self.source
    }

    /// Sequence counter accessor.
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Window capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window entries, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &WireMessage> {
        self.window.iter()
    }

    /// Number of messages in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check whether nothing has been sent yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for TransmitSession {
    fn default() -> Self {
        Self::new(TransmitConfig::default())
    }
}
