//! midi-relay error types

use thiserror::Error;

/// Errors raised by the codecs, the session layer and the UDP adapter.
///
/// Packet-level failures (`InvalidHeader`, `TruncatedPacket`) drop a single
/// datagram; message-level failures (`MalformedMessage`, `UnrecognizedPayload`)
/// drop a single message. None of them poison session state.
#[derive(Error, Debug)]
pub enum Error {
    /// Datagram does not start with the expected header literal
    #[error("invalid packet header")]
    InvalidHeader,

    /// Declared length runs past the end of the datagram
    #[error("truncated packet: need {needed} bytes, got {got}")]
    TruncatedPacket {
        /// Bytes required to continue parsing
        needed: usize,
        /// Bytes actually available
        got: usize,
    },

    /// Message bytes do not form the expected message kind
    #[error("malformed message: {reason}")]
    MalformedMessage {
        /// What was wrong with the message
        reason: &'static str,
    },

    /// Payload is not of the requested message kind
    #[error("unrecognized payload")]
    UnrecognizedPayload,

    /// Cue address text could not be parsed
    #[error("invalid cue address: {0:?}")]
    InvalidCueAddress(String),

    /// Cue number is negative or not finite
    #[error("invalid cue number: {0}")]
    InvalidCueNumber(f64),

    /// MSC hex data entry could not be parsed
    #[error("invalid hex payload: {0:?}")]
    InvalidHexPayload(String),

    /// Message does not fit a one-byte length prefix
    #[error("message too long: {len} bytes (max {max})")]
    MessageTooLong {
        /// Message length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
