//! Eos cue number encoding
//!
//! Each decimal digit `d` of the rendered number becomes `0x30 | d` and the
//! decimal point becomes `0x2E`. Cue numbers are rendered in their shortest
//! decimal form, so `12.5` encodes as `33 32 2E 35` and `4.0` as `34`.

use crate::protocol::{Error, Result};

/// Byte written for a decimal point
pub const DECIMAL_POINT: u8 = 0x2E;

/// High nibble applied to every digit
pub const DIGIT_BASE: u8 = 0x30;

/// Encode a non-negative, finite cue number
///
/// # Errors
///
/// Returns [`Error::InvalidCueNumber`] for negative or non-finite input.
pub fn eos_encode(value: f64) -> Result<Vec<u8>> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidCueNumber(value));
    }
    // abs() folds -0.0 into 0.0 so the sign never reaches the renderer.
    let rendered = value.abs().to_string();
    Ok(encode_rendered(&rendered))
}

fn encode_rendered(rendered: &str) -> Vec<u8> {
    rendered
        .bytes()
        .map(|ch| match ch {
            b'.' => DECIMAL_POINT,
            digit => DIGIT_BASE | (digit - b'0'),
        })
        .collect()
}
