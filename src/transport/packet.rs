//! Windowed packet wire format.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::protocol::{Error, Result, WireMessage};

/// Literal that opens every windowed packet.
pub const PACKET_HEADER: &[u8; 7] = b"MIDIWIN";

/// Size of the source identifier in bytes.
pub const SOURCE_ID_LEN: usize = 16;

/// Bytes before the first window entry (header + source + sequence).
pub const PACKET_PREFIX_LEN: usize = PACKET_HEADER.len() + SOURCE_ID_LEN + 1;

/// Snapshot of a sender's history window.
///
/// # Wire Format
///
/// ```text
/// +---------------------------+
/// | "MIDIWIN" (7)             |
/// +---------------------------+
/// | Source Identifier (16)    |
/// +---------------------------+
/// | Sequence (1)              |
/// +---------------------------+
/// | Len (1) | Payload (Len)   |  repeated until the end of the datagram,
/// +---------------------------+  oldest entry first
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    source: Uuid,
    sequence: u8,
    entries: Vec<WireMessage>,
}

impl Packet {
    /// Create a packet from its parts.
    #[must_use]
    pub fn new(source: Uuid, sequence: u8, entries: Vec<WireMessage>) -> Self {
        Self {
            source,
            sequence,
            entries,
        }
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

    /// Window entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[WireMessage] {
        &self.entries
    }

    /// Consume the packet and return its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<WireMessage> {
        self.entries
    }

    /// Encode into a datagram payload.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        encode_parts(self.source, self.sequence, &self.entries)
    }

    /// Decode a datagram payload.
    ///
    /// Entries are zero-copy slices of `datagram`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHeader`] if the datagram does not start with [`PACKET_HEADER`]
    /// - [`Error::TruncatedPacket`] if the prefix is cut short or an entry
    ///   length runs past the end
    pub fn decode(datagram: &Bytes) -> Result<Self> {
        if !datagram.starts_with(PACKET_HEADER) {
            return Err(Error::InvalidHeader);
        }
        if datagram.len() < PACKET_PREFIX_LEN {
            return Err(Error::TruncatedPacket {
                needed: PACKET_PREFIX_LEN,
                got: datagram.len(),
            });
        }

        let mut offset = PACKET_HEADER.len();
        let mut source = [0u8; SOURCE_ID_LEN];
        source.copy_from_slice(&datagram[offset..offset + SOURCE_ID_LEN]);
        offset += SOURCE_ID_LEN;
        let sequence = datagram[offset];
        offset += 1;

        let mut entries = Vec::new();
        while offset < datagram.len() {
            let len = usize::from(datagram[offset]);
            offset += 1;
            let end = offset + len;
            if end > datagram.len() {
                return Err(Error::TruncatedPacket {
                    needed: end,
                    got: datagram.len(),
                });
            }
            entries.push(WireMessage::from_entry(datagram.slice(offset..end)));
            offset = end;
        }

        Ok(Self {
            source: Uuid::from_bytes(source),
            sequence,
            entries,
        })
    }
}

/// Write a packet from borrowed parts.
pub(crate) fn encode_parts<'a, I>(source: Uuid, sequence: u8, entries: I) -> Bytes
where
    I: IntoIterator<Item = &'a WireMessage>,
{
    let mut out = BytesMut::with_capacity(PACKET_PREFIX_LEN + 64);
    out.put_slice(PACKET_HEADER);
    out.put_slice(source.as_bytes());
    out.put_u8(sequence);
    for entry in entries {
        out.put_u8(entry.len_prefix());
        out.put_slice(entry.as_bytes());
    }
    out.freeze()
}
