//! midi-relay - loss-tolerant MIDI over UDP and MIDI Show Control encoding
//!
//! Senders re-transmit a bounded window of recent messages in every packet;
//! receivers keep one sequence cursor per sender and deliver only the
//! messages they have not seen. A companion MSC encoder builds show-control
//! frames, including the Eos cue number dialect.
//!
//! # Quick Start
//!
//! ```rust
//! use midi_relay::{ReceiveTable, ShortMessage, TransmitSession};
//!
//! let mut tx = TransmitSession::default();
//! let mut rx = ReceiveTable::default();
//!
//! // The first packet from a source only registers it.
//! rx.ingest(&tx.send(ShortMessage::note_on(60)))?;
//!
//! let _lost = tx.send(ShortMessage::note_off(60));
//! let delivered = rx.ingest(&tx.send(ShortMessage::note_on(62)))?;
//! assert_eq!(delivered.len(), 2);
//! # Ok::<(), midi_relay::Error>(())
//! ```
//!
//! ```rust
//! use midi_relay::msc::{CommandFormat, MscCommand, build_command, encode_cue_address};
//!
//! let payload = encode_cue_address("4/101.5")?;
//! let frame = build_command(1, CommandFormat::Lighting.as_u8(), MscCommand::Go.as_u8(), &payload);
//! assert_eq!(&frame[..6], &[0xF0, 0x7F, 0x01, 0x02, 0x01, 0x01]);
//! # Ok::<(), midi_relay::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod msc;
pub mod protocol;
pub mod transport;

pub use protocol::{Error, Result, ShortMessage, WireMessage};
pub use transport::{Packet, ReceiveTable, TransmitSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
