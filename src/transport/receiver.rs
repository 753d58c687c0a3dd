//! Receive session table: one reconciliation cursor per source.
//!
//! A packet goes through three stages:
//!
//! 1. The whole datagram is decoded. Any error is returned before state is
//!    touched, so a malformed packet never moves a cursor.
//! 2. The sequence counter is compared to the source's cursor. The first
//!    packet from a source only registers the cursor; equal counters are
//!    duplicates and lower counters are stale.
//! 3. For a newer counter the last `received - previous` entries are
//!    delivered, oldest first, capped at the number of entries present.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, trace};
use uuid::Uuid;

use super::config::{ReceiveConfig, SequenceOrdering};
use super::packet::Packet;
use crate::protocol::{Result, WireMessage};

/// Per-source receiver state.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    sequence: u8,
    last_seen: Instant,
}

/// Counters describing what the table has done with incoming datagrams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceiveStats {
    /// Packets that registered a new source.
    pub bootstraps: u64,
    /// Packets with a newer sequence counter.
    pub accepted: u64,
    /// Packets repeating the current sequence counter.
    pub duplicates: u64,
    /// Packets with an older sequence counter.
    pub stale: u64,
    /// Datagrams rejected as malformed.
    pub rejected: u64,
    /// Messages handed to the caller.
    pub delivered: u64,
}

/// Reconciles windowed packets from any number of senders.
#[derive(Debug, Clone, Default)]
pub struct ReceiveTable {
    config: ReceiveConfig,
    cursors: HashMap<Uuid, Cursor>,
    stats: ReceiveStats,
}

impl ReceiveTable {
    /// Create an empty table.
    #[must_use]
    pub fn new(config: ReceiveConfig) -> Self {
        Self {
            config,
            cursors: HashMap::new(),
            stats: ReceiveStats::default(),
        }
    }

    /// Ingest one datagram and return the messages it makes newly known.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidHeader`] or [`crate::Error::TruncatedPacket`]
    /// for malformed datagrams. The table is left unchanged.
    pub fn ingest(&mut self, datagram: &Bytes) -> Result<Vec<WireMessage>> {
        self.ingest_at(datagram, Instant::now())
    }

    /// [`ingest`](Self::ingest) with an explicit clock reading.
    pub fn ingest_at(&mut self, datagram: &Bytes, now: Instant) -> Result<Vec<WireMessage>> {
        let packet = match Packet::decode(datagram) {
            Ok(packet) => packet,
            Err(err) => {
                self.stats.rejected += 1;
                debug!(error = %err, len = datagram.len(), "dropping malformed packet");
                return Err(err);
            }
        };
        Ok(self.reconcile(packet, now))
    }

    fn reconcile(&mut self, packet: Packet, now: Instant) -> Vec<WireMessage> {
        let source = packet.source();
        let received = packet.sequence();

        let Some(cursor) = self.cursors.get_mut(&source) else {
            debug!(%source, sequence = received, "new source");
            self.cursors.insert(
                source,
                Cursor {
                    sequence: received,
                    last_seen: now,
                },
            );
            self.stats.bootstraps += 1;
            return Vec::new();
        };

        let previous = cursor.sequence;
        match self.config.ordering.compare(previous, received) {
            Ordering::Equal => {
                trace!(%source, sequence = received, "duplicate packet");
                self.stats.duplicates += 1;
                return Vec::new();
            }
            Ordering::Less => {
                debug!(%source, previous, received, "sequence went backwards, ignoring");
                self.stats.stale += 1;
                return Vec::new();
            }
            Ordering::Greater => {
                cursor.sequence = received;
                cursor.last_seen = now;
            }
        }
        self.stats.accepted += 1;

        let advance = SequenceOrdering::advance(previous, received);
        let mut entries = packet.into_entries();
        let keep = advance.min(entries.len());
        if keep < advance {
            debug!(
                %source,
                advance,
                available = entries.len(),
                "sequence jumped past the window; some messages were lost"
            );
        }
        let fresh = entries.split_off(entries.len() - keep);
        trace!(%source, previous, received, delivered = fresh.len(), "accepted packet");
        self.stats.delivered += fresh.len() as u64;
        fresh
    }

    /// Drop cursors for sources idle longer than the configured timeout.
    ///
    /// Only packets that advance a cursor count as activity; replayed
    /// duplicates and stale packets do not keep a source alive.
    ///
    /// Returns the number of sources removed. A removed source bootstraps
    /// again on its next packet.
    pub fn prune_idle(&mut self, now: Instant) -> usize {
        let Some(timeout) = self.config.idle_timeout else {
            return 0;
        };
        let before = self.cursors.len();
        self.cursors.retain(|source, cursor| {
            let keep = now.saturating_duration_since(cursor.last_seen) <= timeout;
            if !keep {
                debug!(%source, "evicting idle source");
            }
            keep
        });
        before - self.cursors.len()
    }

    /// Forget a source.
    pub fn forget(&mut self, source: &Uuid) -> bool {
        self.cursors.remove(source).is_some()
    }

    /// Last accepted sequence counter for `source`.
    #[must_use]
    pub fn cursor(&self, source: &Uuid) -> Option<u8> {
        self.cursors.get(source).map(|cursor| cursor.sequence)
    }

    /// Known sources, in no particular order.
    pub fn sources(&self) -> impl Iterator<Item = &Uuid> {
        self.cursors.keys()
    }

    /// Number of known sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Check whether no source has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Statistics accessor.
    #[must_use]
    pub const fn stats(&self) -> &ReceiveStats {
        &self.stats
    }

    /// Configuration accessor.
    #[must_use]
    pub const fn config(&self) -> &ReceiveConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::protocol::Error;

    const SOURCE_A: Uuid = Uuid::from_u128(0xA);
    const SOURCE_B: Uuid = Uuid::from_u128(0xB);

    fn msg(tag: u8) -> WireMessage {
        WireMessage::new(vec![tag]).unwrap()
    }

    fn packet(source: Uuid, sequence: u8, tags: &[u8]) -> Bytes {
        Packet::new(source, sequence, tags.iter().map(|t| msg(*t)).collect()).encode()
    }

    fn tags(messages: &[WireMessage]) -> Vec<u8> {
        messages.iter().map(|m| m.as_bytes()[0]).collect()
    }

    #[test]
    fn bootstrap_delivers_nothing() {
        let mut table = ReceiveTable::default();
        let out = table.ingest(&packet(SOURCE_A, 17, &[1, 2, 3])).unwrap();
        assert!(out.is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(17));
        assert_eq!(table.stats().bootstraps, 1);
    }

    #[test]
    fn duplicate_is_suppressed() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 1, &[1])).unwrap();
        let second = packet(SOURCE_A, 2, &[1, 2]);
        assert_eq!(tags(&table.ingest(&second).unwrap()), vec![2]);
        assert!(table.ingest(&second).unwrap().is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(2));
        assert_eq!(table.stats().duplicates, 1);
    }

    #[test]
    fn stale_packet_does_not_move_cursor() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 10, &[1])).unwrap();
        assert!(table.ingest(&packet(SOURCE_A, 9, &[1, 2])).unwrap().is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(10));
        assert_eq!(table.stats().stale, 1);
    }

    #[test]
    fn forward_delta_delivers_tail_oldest_first() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 5, &[1, 2])).unwrap();
        let out = table.ingest(&packet(SOURCE_A, 8, &[1, 2, 3, 4, 5])).unwrap();
        assert_eq!(tags(&out), vec![3, 4, 5]);
        assert_eq!(table.cursor(&SOURCE_A), Some(8));
    }

    #[test]
    fn delta_is_capped_at_window_length() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 1, &[1])).unwrap();
        let out = table.ingest(&packet(SOURCE_A, 40, &[7, 8])).unwrap();
        assert_eq!(tags(&out), vec![7, 8]);
        assert_eq!(table.cursor(&SOURCE_A), Some(40));
    }

    #[test]
    fn empty_window_still_advances_cursor() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 1, &[])).unwrap();
        assert!(table.ingest(&packet(SOURCE_A, 3, &[])).unwrap().is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(3));
    }

    #[test]
    fn malformed_packets_leave_table_untouched() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_B, 4, &[1])).unwrap();

        let mut bad_header = packet(SOURCE_B, 9, &[1, 2]).to_vec();
        bad_header[0] = b'm';
        assert!(matches!(
            table.ingest(&Bytes::from(bad_header)),
            Err(Error::InvalidHeader)
        ));

        let truncated = packet(SOURCE_A, 9, &[1, 2]);
        let truncated = truncated.slice(..truncated.len() - 1);
        assert!(matches!(
            table.ingest(&truncated),
            Err(Error::TruncatedPacket { .. })
        ));

        // A truncated packet from B does not move B either.
        let truncated_b = packet(SOURCE_B, 9, &[1, 2]);
        let truncated_b = truncated_b.slice(..truncated_b.len() - 1);
        assert!(table.ingest(&truncated_b).is_err());

        assert_eq!(table.cursor(&SOURCE_A), None);
        assert_eq!(table.cursor(&SOURCE_B), Some(4));
        assert_eq!(table.len(), 1);
        assert_eq!(table.stats().rejected, 3);
    }

    #[test]
    fn sources_are_independent() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 1, &[1])).unwrap();
        table.ingest(&packet(SOURCE_B, 200, &[9])).unwrap();
        assert_eq!(tags(&table.ingest(&packet(SOURCE_A, 2, &[1, 2])).unwrap()), vec![2]);
        assert_eq!(table.cursor(&SOURCE_B), Some(200));
    }

    #[test]
    fn linear_ordering_stalls_after_wrap() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 254, &[1])).unwrap();
        assert!(table.ingest(&packet(SOURCE_A, 0, &[1, 2])).unwrap().is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(254));
    }

    #[test]
    fn serial_ordering_follows_wrap() {
        let mut table = ReceiveTable::new(ReceiveConfig {
            ordering: SequenceOrdering::Serial,
            ..ReceiveConfig::default()
        });
        table.ingest(&packet(SOURCE_A, 254, &[1])).unwrap();
        let out = table.ingest(&packet(SOURCE_A, 1, &[1, 2, 3, 4])).unwrap();
        assert_eq!(tags(&out), vec![2, 3, 4]);
        assert_eq!(table.cursor(&SOURCE_A), Some(1));
        assert!(table.ingest(&packet(SOURCE_A, 255, &[1, 2])).unwrap().is_empty());
    }

    #[test]
    fn idle_sources_are_pruned() {
        let mut table = ReceiveTable::new(ReceiveConfig {
            idle_timeout: Some(Duration::from_secs(5)),
            ..ReceiveConfig::default()
        });
        let start = Instant::now();
        table.ingest_at(&packet(SOURCE_A, 1, &[1]), start).unwrap();
        table.ingest_at(&packet(SOURCE_B, 1, &[1]), start).unwrap();
        table
            .ingest_at(&packet(SOURCE_B, 2, &[1, 2]), start + Duration::from_secs(4))
            .unwrap();

        assert_eq!(table.prune_idle(start + Duration::from_secs(8)), 1);
        assert_eq!(table.cursor(&SOURCE_A), None);
        assert_eq!(table.cursor(&SOURCE_B), Some(2));

        // A pruned source bootstraps again.
        let later = start + Duration::from_secs(9);
        assert!(table.ingest_at(&packet(SOURCE_A, 6, &[1, 2]), later).unwrap().is_empty());
        assert_eq!(table.cursor(&SOURCE_A), Some(6));
    }

    #[test]
    fn replays_do_not_keep_a_source_alive() {
        let mut table = ReceiveTable::new(ReceiveConfig {
            idle_timeout: Some(Duration::from_secs(5)),
            ..ReceiveConfig::default()
        });
        let start = Instant::now();
        table.ingest_at(&packet(SOURCE_A, 3, &[1]), start).unwrap();
        table.ingest_at(&packet(SOURCE_A, 4, &[1, 2]), start + Duration::from_secs(1)).unwrap();

        // Duplicate and stale replays arrive well after the last new message.
        let late = start + Duration::from_secs(5);
        table.ingest_at(&packet(SOURCE_A, 4, &[1, 2]), late).unwrap();
        table.ingest_at(&packet(SOURCE_A, 2, &[1]), late).unwrap();

        assert_eq!(table.prune_idle(start + Duration::from_secs(7)), 1);
        assert_eq!(table.cursor(&SOURCE_A), None);
    }

    #[test]
    fn prune_without_timeout_is_noop() {
        let mut table = ReceiveTable::default();
        table.ingest(&packet(SOURCE_A, 1, &[1])).unwrap();
        assert_eq!(table.prune_idle(Instant::now() + Duration::from_secs(3600)), 0);
        assert!(table.forget(&SOURCE_A));
        assert!(table.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the first packet of any source delivers nothing
            #[test]
            fn prop_bootstrap_discards(sequence in any::<u8>(), tags_in in prop::collection::vec(any::<u8>(), 1..20)) {
                let mut table = ReceiveTable::default();
                let out = table.ingest(&packet(SOURCE_A, sequence, &tags_in)).unwrap();
                prop_assert!(out.is_empty());
                prop_assert_eq!(table.cursor(&SOURCE_A), Some(sequence));
            }

            /// Property: delivered messages are the newest min(delta, len) entries
            #[test]
            fn prop_forward_delivery(
                start in 0u8..128,
                delta in 1u8..=127,
                tags_in in prop::collection::vec(any::<u8>(), 0..20),
            ) {
                let mut table = ReceiveTable::default();
                table.ingest(&packet(SOURCE_A, start, &[])).unwrap();
                let out = table.ingest(&packet(SOURCE_A, start + delta, &tags_in)).unwrap();
                let keep = usize::from(delta).min(tags_in.len());
                prop_assert_eq!(tags(&out), tags_in[tags_in.len() - keep..].to_vec());
                prop_assert_eq!(table.cursor(&SOURCE_A), Some(start + delta));
            }

            /// Property: replaying an accepted packet delivers nothing
            #[test]
            fn prop_replay_is_empty(start in 0u8..200, delta in 1u8..50) {
                let mut table = ReceiveTable::default();
                table.ingest(&packet(SOURCE_A, start, &[0])).unwrap();
                let next = packet(SOURCE_A, start + delta, &[1, 2, 3]);
                table.ingest(&next).unwrap();
                prop_assert!(table.ingest(&next).unwrap().is_empty());
            }
        }
    }
}
