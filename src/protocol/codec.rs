//! Short message codec (encode/decode)

use super::{Error, Result, SHORT_MESSAGE_SIZE, ShortMessage};

/// Encode a short message
///
/// # Format
///
/// ```text
/// [STATUS (1)] [DATA1 (1)] [DATA2 (1)]
/// ```
#[must_use]
pub fn encode_short_message(status: u8, data1: u8, data2: u8) -> [u8; SHORT_MESSAGE_SIZE] {
    ShortMessage::new(status, data1, data2).to_bytes()
}

/// Decode a short message from the first three bytes of `bytes`
///
/// # Errors
///
/// Returns [`Error::MalformedMessage`] if fewer than three bytes are present.
pub fn decode_short_message(bytes: &[u8]) -> Result<ShortMessage> {
    match bytes {
        [status, data1, data2, ..] => Ok(ShortMessage::new(*status, *data1, *data2)),
        _ => Err(Error::MalformedMessage {
            reason: "short message needs 3 bytes",
        }),
    }
}
