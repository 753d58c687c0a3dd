//! MIDI timecode full-frame messages

use std::fmt;

use super::{Error, Result, Status, TIMECODE_START};

const RATE_SHIFT: u8 = 5;
const RATE_MASK: u8 = 0b11;
const HOURS_MASK: u8 = 0x1F;

/// Frame rate carried in bits 5-6 of the hours byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FrameRate {
    /// 24 fps
    Fps24 = 0,
    /// 25 fps
    Fps25 = 1,
    /// 29.97 fps drop-frame
    Fps2997Drop = 2,
    /// 30 fps
    Fps30 = 3,
}

impl FrameRate {
    /// Decode the two rate bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & RATE_MASK {
            0 => Self::Fps24,
            1 => Self::Fps25,
            2 => Self::Fps2997Drop,
            _ => Self::Fps30,
        }
    }

    /// Two-bit wire representation
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Position decoded from a full-frame timecode message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timecode {
    /// Hours (0-23)
    pub hours: u8,
    /// Minutes
    pub minutes: u8,
    /// Seconds
    pub seconds: u8,
    /// Frames
    pub frames: u8,
    /// Frame rate
    pub rate: FrameRate,
}

impl Timecode {
    /// Encode as a full-frame message
    ///
    /// ```text
    /// F0 7F 7F 01 01 <0rrhhhhh> <mm> <ss> <ff> F7
    /// ```
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TIMECODE_START.len() + 5);
        out.extend_from_slice(&TIMECODE_START);
        out.push((self.rate.bits() << RATE_SHIFT) | (self.hours & HOURS_MASK));
        out.push(self.minutes);
        out.push(self.seconds);
        out.push(self.frames);
        out.push(Status::SYSEX_END);
        out
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Decode a full-frame timecode message
///
/// The message is recognised by the complete five-byte full-frame prefix
/// [`TIMECODE_START`] rather than by `F0 7F` alone, which MSC frames share.
/// The trailing `F7` is not required.
///
/// # Errors
///
/// - [`Error::UnrecognizedPayload`] if the message does not start with the
///   timecode marker; callers should try other message kinds
/// - [`Error::MalformedMessage`] if the marker is followed by fewer than four
///   value bytes
pub fn decode_timecode(bytes: &[u8]) -> Result<Timecode> {
    let rest = bytes
        .strip_prefix(TIMECODE_START.as_slice())
        .ok_or(Error::UnrecognizedPayload)?;

    match rest {
        [hours, minutes, seconds, frames, ..] => Ok(Timecode {
            hours: hours & HOURS_MASK,
            minutes: *minutes,
            seconds: *seconds,
            frames: *frames,
            rate: FrameRate::from_bits(hours >> RATE_SHIFT),
        }),
        _ => Err(Error::MalformedMessage {
            reason: "timecode needs hours, minutes, seconds and frames",
        }),
    }
}
