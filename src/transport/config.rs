//! Session configuration

use std::cmp::Ordering;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default number of messages re-sent in every packet.
pub const DEFAULT_WINDOW_CAPACITY: usize = 10;

/// Largest UDP payload; any valid packet fits a buffer of this size.
pub const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Transmit session configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmitConfig {
    /// History window capacity (clamped to at least one entry).
    pub window_capacity: usize,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

/// How a receiver orders sequence counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceOrdering {
    /// Plain unsigned comparison. A sender that wraps from 255 to 0 looks
    /// stale until its counter climbs past the stored cursor again.
    #[default]
    Linear,
    /// Serial-number arithmetic (RFC 1982): a forward distance of 1..=127
    /// is newer, so 255 -> 0 advances by one.
    Serial,
}

impl SequenceOrdering {
    /// Order `received` relative to `previous`.
    #[must_use]
    pub fn compare(self, previous: u8, received: u8) -> Ordering {
        match self {
            Self::Linear => received.cmp(&previous),
            Self::Serial => match received.wrapping_sub(previous) {
                0 => Ordering::Equal,
                1..=127 => Ordering::Greater,
                _ => Ordering::Less,
            },
        }
    }

    /// Number of messages appended between `previous` and a newer `received`.
    ///
    /// The distance is the same under either ordering.
    #[must_use]
    pub fn advance(previous: u8, received: u8) -> usize {
        usize::from(received.wrapping_sub(previous))
    }
}

/// Receive table configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceiveConfig {
    /// Sequence comparison rule.
    pub ordering: SequenceOrdering,
    /// Drop cursors for sources silent longer than this (see `prune_idle`).
    pub idle_timeout: Option<Duration>,
}

/// Socket options shared by both link endpoints.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Receive buffer size in bytes. Datagrams longer than this are cut short
    /// by the socket and rejected as truncated.
    pub buffer_size: usize,
    /// Optional read timeout for sockets.
    pub read_timeout: Option<Duration>,
    /// Optional write timeout for sockets.
    pub write_timeout: Option<Duration>,
    /// Loop multicast traffic back to local listeners.
    pub multicast_loop: bool,
    /// IPv4 multicast groups to join on bind.
    pub multicast_groups: Vec<Ipv4Addr>,
    /// Local interface address used for group membership; unspecified lets
    /// the OS choose.
    pub multicast_interface: Ipv4Addr,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            buffer_size: MAX_DATAGRAM_SIZE,
            read_timeout: None,
            write_timeout: None,
            multicast_loop: true,
            multicast_groups: Vec::new(),
            multicast_interface: Ipv4Addr::UNSPECIFIED,
        }
    }
}
