//! `MIDI XX XX ..` text form
//!
//! The human-readable rendering doubles as the datagram payload of the simple
//! (non-windowed) MIDI-over-UDP mode.

use std::fmt::Write;

use super::{Error, Result, TEXT_PREFIX};

/// Render `bytes` as `MIDI` followed by one ` XX` token per byte
#[must_use]
pub fn render_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(TEXT_PREFIX.len() + bytes.len() * 3);
    out.push_str("MIDI");
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, " {byte:02X}");
    }
    out
}

/// Parse a text-form datagram back into message bytes
///
/// Tokens are separated by runs of spaces; each must be one or two hex digits.
///
/// # Errors
///
/// - [`Error::UnrecognizedPayload`] if the datagram does not start with `MIDI`
/// - [`Error::MalformedMessage`] if a token is not a hex byte
pub fn parse_text(datagram: &[u8]) -> Result<Vec<u8>> {
    let rest = datagram
        .strip_prefix(TEXT_PREFIX.as_slice())
        .ok_or(Error::UnrecognizedPayload)?;
    let rest = std::str::from_utf8(rest).map_err(|_| Error::MalformedMessage {
        reason: "text form is not ASCII",
    })?;

    rest.split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| {
            if token.len() > 2 {
                return Err(Error::MalformedMessage {
                    reason: "hex token longer than one byte",
                });
            }
            if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::MalformedMessage {
                    reason: "token is not a hex byte",
                });
            }
            u8::from_str_radix(token, 16).map_err(|_| Error::MalformedMessage {
                reason: "token is not a hex byte",
            })
        })
        .collect()
}
