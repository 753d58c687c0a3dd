//! MIDI message types

use std::fmt;

use bytes::Bytes;

use super::{Error, MAX_MESSAGE_SIZE, Result, SHORT_MESSAGE_SIZE};

/// Velocity used by the note helpers
pub const DEFAULT_VELOCITY: u8 = 64;

/// Well-known MIDI status bytes
#[derive(Debug)]
pub struct Status;

impl Status {
    /// Note off, channel 1
    pub const NOTE_OFF: u8 = 0x80;
    /// Note on, channel 1
    pub const NOTE_ON: u8 = 0x90;
    /// Start of a system-exclusive message
    pub const SYSEX_START: u8 = 0xF0;
    /// End of a system-exclusive message
    pub const SYSEX_END: u8 = 0xF7;
}

/// Three-byte channel message
///
/// The bytes are carried verbatim; channel semantics are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortMessage {
    /// Status byte
    pub status: u8,
    /// First data byte
    pub data1: u8,
    /// Second data byte
    pub data2: u8,
}

impl ShortMessage {
    /// Create a message from raw bytes
    #[must_use]
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    /// Note on with the default velocity
    #[must_use]
    pub const fn note_on(note: u8) -> Self {
        Self::new(Status::NOTE_ON, note, DEFAULT_VELOCITY)
    }

    /// Note off with the default velocity
    #[must_use]
    pub const fn note_off(note: u8) -> Self {
        Self::new(Status::NOTE_OFF, note, DEFAULT_VELOCITY)
    }

    /// Raw bytes in wire order
    #[must_use]
    pub const fn to_bytes(self) -> [u8; SHORT_MESSAGE_SIZE] {
        [self.status, self.data1, self.data2]
    }

    /// Pack into the `status | data1 << 8 | data2 << 16` word used by
    /// short-message output drivers
    #[must_use]
    pub fn pack(self) -> u32 {
        u32::from(self.status) | (u32::from(self.data1) << 8) | (u32::from(self.data2) << 16)
    }
}

impl From<ShortMessage> for WireMessage {
    fn from(message: ShortMessage) -> Self {
        Self(Bytes::copy_from_slice(&message.to_bytes()))
    }
}

/// Message payload that fits a session window entry
///
/// Window entries are length-prefixed with a single byte, so a `WireMessage`
/// is at most [`MAX_MESSAGE_SIZE`] bytes long.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct WireMessage(Bytes);

impl WireMessage {
    /// Wrap a payload, rejecting anything longer than [`MAX_MESSAGE_SIZE`]
    pub fn new(payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(Error::MessageTooLong {
                len: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(Self(payload))
    }

    /// Build from a slice of a validated packet
    pub(crate) fn from_entry(payload: Bytes) -> Self {
        debug_assert!(payload.len() <= MAX_MESSAGE_SIZE);
        Self(payload)
    }

    /// Payload bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length as it appears in the one-byte prefix
    #[must_use]
    pub fn len_prefix(&self) -> u8 {
        // Bounded by construction.
        u8::try_from(self.0.len()).unwrap_or(u8::MAX)
    }

    /// Consume and return the payload
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for WireMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for WireMessage {
    type Error = Error;

    fn try_from(payload: Vec<u8>) -> Result<Self> {
        Self::new(payload)
    }
}

impl TryFrom<&[u8]> for WireMessage {
    type Error = Error;

    fn try_from(payload: &[u8]) -> Result<Self> {
        Self::new(Bytes::copy_from_slice(payload))
    }
}

impl fmt::Debug for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WireMessage(")?;
        for (idx, byte) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        write!(f, ")")
    }
}
