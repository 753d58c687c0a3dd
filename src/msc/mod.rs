//! MIDI Show Control
//!
//! Frame construction, the command catalogues, the Eos cue number dialect and
//! a composer that keeps a frame in sync with editable fields.

mod command;
mod composer;
mod cue;
mod eos;

pub use command::{
    ALL_CALL_DEVICE, CommandFormat, MSC_SUB_ID, MscCommand, UNIVERSAL_REAL_TIME, build_command,
    parse_hex_payload, render_hex,
};
pub use composer::{MscComposer, PayloadMode};
pub use cue::{CUE_SEPARATOR, CueAddress, encode_cue_address};
pub use eos::{DECIMAL_POINT, DIGIT_BASE, eos_encode};
