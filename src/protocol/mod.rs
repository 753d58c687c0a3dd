//! MIDI message codecs
//!
//! This module provides short-message packing, the `MIDI XX ..` text form,
//! timecode decoding and the length-bounded [`WireMessage`] carried by sessions.

mod codec;
mod error;
mod message;
mod text;
mod timecode;

pub use codec::{decode_short_message, encode_short_message};
pub use error::{Error, Result};
pub use message::{DEFAULT_VELOCITY, ShortMessage, Status, WireMessage};
pub use text::{parse_text, render_text};
pub use timecode::{FrameRate, Timecode, decode_timecode};

/// Literal prefix of the text wire form
pub const TEXT_PREFIX: &[u8; 4] = b"MIDI";

/// Short message size in bytes (status + two data bytes)
pub const SHORT_MESSAGE_SIZE: usize = 3;

/// Largest message a session window entry can carry (one-byte length prefix)
pub const MAX_MESSAGE_SIZE: usize = u8::MAX as usize;

/// MIDI timecode full-frame prefix (universal real-time SysEx, all devices)
pub const TIMECODE_START: [u8; 5] = [0xF0, 0x7F, 0x7F, 0x01, 0x01];
