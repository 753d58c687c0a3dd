use std::collections::HashSet;

use bytes::Bytes;
use midi_relay::protocol::decode_short_message;
use midi_relay::transport::{ReceiveConfig, SequenceOrdering, TransmitConfig};
use midi_relay::{Error, ReceiveTable, ShortMessage, TransmitSession, WireMessage};
use uuid::Uuid;

#[derive(Default)]
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;
        self.0 = self.0.wrapping_mul(A).wrapping_add(C);
        self.0 >> 33
    }
}

/// Drops, duplicates and locally reorders datagrams.
struct SimLink {
    rng: Lcg,
    drop_rate: u64,
    dup_rate: u64,
    held: Option<Bytes>,
}

impl SimLink {
    fn new(seed: u64, drop_rate: u64, dup_rate: u64) -> Self {
        Self {
            rng: Lcg(seed),
            drop_rate,
            dup_rate,
            held: None,
        }
    }

    fn transmit(&mut self, packet: Bytes, out: &mut Vec<Bytes>) {
        if self.rng.next() % 100 < self.drop_rate {
            return;
        }
        if self.rng.next() % 100 < self.dup_rate {
            out.push(packet.clone());
        }
        // Occasionally swap with the previously held packet.
        if self.rng.next() % 10 == 0 {
            if let Some(previous) = self.held.replace(packet) {
                out.push(previous);
            }
            return;
        }
        out.push(packet);
        if let Some(previous) = self.held.take() {
            out.push(previous);
        }
    }
}

fn note(seq: u16) -> ShortMessage {
    ShortMessage::new(0x90, (seq % 128) as u8, (seq / 128) as u8)
}

fn id(message: &WireMessage) -> u16 {
    let msg = decode_short_message(message.as_bytes()).unwrap();
    u16::from(msg.data1) + u16::from(msg.data2) * 128
}

#[test]
fn window_hides_isolated_losses() {
    let mut tx = TransmitSession::new(TransmitConfig { window_capacity: 8 });
    let mut rx = ReceiveTable::default();
    let mut delivered = Vec::new();

    // Register the source before counting deliveries.
    rx.ingest(&tx.send(note(0))).unwrap();

    for seq in 1..200u16 {
        let packet = tx.send(note(seq));
        // Drop every third packet.
        if seq % 3 == 0 {
            continue;
        }
        delivered.extend(rx.ingest(&packet).unwrap());
        if tx.sequence() == 255 {
            break;
        }
    }

    let ids: Vec<u16> = delivered.iter().map(id).collect();
    let expected: Vec<u16> = (1..=ids.len() as u16).collect();
    assert_eq!(ids, expected, "delivery must be gap-free and in order");
    assert!(ids.len() >= 190);
}

#[test]
fn duplicates_and_reordering_never_redeliver() {
    let mut tx = TransmitSession::new(TransmitConfig { window_capacity: 10 });
    let mut rx = ReceiveTable::default();
    let mut link = SimLink::new(42, 20, 30);
    let mut seen = HashSet::new();

    rx.ingest(&tx.send(note(0))).unwrap();

    let mut inflight = Vec::new();
    for seq in 1..250u16 {
        link.transmit(tx.send(note(seq)), &mut inflight);
        for packet in inflight.drain(..) {
            for message in rx.ingest(&packet).unwrap() {
                assert!(seen.insert(id(&message)), "message redelivered");
            }
        }
    }

    let stats = rx.stats();
    assert!(stats.duplicates > 0);
    assert!(stats.accepted > 100);
    assert_eq!(stats.delivered as usize, seen.len());
}

#[test]
fn serial_ordering_survives_counter_wrap() {
    let mut tx = TransmitSession::new(TransmitConfig { window_capacity: 4 });
    let mut rx = ReceiveTable::new(ReceiveConfig {
        ordering: SequenceOrdering::Serial,
        idle_timeout: None,
    });

    rx.ingest(&tx.send(note(0))).unwrap();
    let mut count = 0;
    for seq in 1..600u16 {
        count += rx.ingest(&tx.send(note(seq))).unwrap().len();
    }
    assert_eq!(count, 599);
}

#[test]
fn many_sources_share_one_table() {
    let mut rx = ReceiveTable::default();
    let mut senders: Vec<TransmitSession> = (0..5u128)
        .map(|n| TransmitSession::with_source(Uuid::from_u128(n + 1), TransmitConfig::default()))
        .collect();

    for tx in &mut senders {
        assert!(rx.ingest(&tx.send(note(0))).unwrap().is_empty());
    }
    for round in 1..4u16 {
        for tx in &mut senders {
            let out = rx.ingest(&tx.send(note(round))).unwrap();
            assert_eq!(out.len(), 1);
            assert_eq!(id(&out[0]), round);
        }
    }

    // Garbage in between leaves every cursor where it was.
    assert!(matches!(
        rx.ingest(&Bytes::from_static(b"MIDI 90 3C 40")),
        Err(Error::InvalidHeader)
    ));
    for tx in &senders {
        assert_eq!(rx.cursor(&tx.source()), Some(4));
    }
    assert_eq!(rx.len(), 5);
}
