//! Eos cue addresses (`cue`, `cuelist/`, `cuelist/cue`)

use std::fmt;
use std::str::FromStr;

use super::eos::eos_encode;
use crate::protocol::{Error, Result};

/// Separator between cue number and cue list in the MSC payload
pub const CUE_SEPARATOR: u8 = 0x00;

/// Parsed cue address
///
/// # Payload layout
///
/// ```text
/// Cue            : Encode(cue) 00
/// List           : 00 Encode(list)
/// ListCue        : Encode(cue) 00 Encode(list)
/// ```
///
/// The cue number always precedes the cue list.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CueAddress {
    /// Bare cue number in the default list
    Cue(f64),
    /// Cue list with no cue number
    List(f64),
    /// Cue number within a cue list
    ListCue {
        /// Cue list number
        list: f64,
        /// Cue number
        cue: f64,
    },
}

impl CueAddress {
    /// Parse cue address text
    ///
    /// The text is split on the first `/`. Each non-empty part must be a
    /// non-negative decimal made of digits and at most one point; a part that
    /// is empty or zero counts as absent. At least one part must be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCueAddress`] if a part does not parse or neither
    /// part is a positive number.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();

        let address = match trimmed.split_once('/') {
            None => parse_part(trimmed, text)?.map(Self::Cue),
            Some((list, cue)) => {
                let list = parse_part(list, text)?;
                let cue = parse_part(cue, text)?;
                match (list, cue) {
                    (Some(list), Some(cue)) => Some(Self::ListCue { list, cue }),
                    (Some(list), None) => Some(Self::List(list)),
                    (None, Some(cue)) => Some(Self::Cue(cue)),
                    (None, None) => None,
                }
            }
        };

        address.ok_or_else(|| Error::InvalidCueAddress(text.to_owned()))
    }

    /// Encode as an MSC data payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCueNumber`] if the address was built by hand with
    /// a negative or non-finite number.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match *self {
            Self::Cue(cue) => {
                out.extend(eos_encode(cue)?);
                out.push(CUE_SEPARATOR);
            }
            Self::List(list) => {
                out.push(CUE_SEPARATOR);
                out.extend(eos_encode(list)?);
            }
            Self::ListCue { list, cue } => {
                out.extend(eos_encode(cue)?);
                out.push(CUE_SEPARATOR);
                out.extend(eos_encode(list)?);
            }
        }
        Ok(out)
    }
}

impl FromStr for CueAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CueAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cue(cue) => write!(f, "{cue}"),
            Self::List(list) => write!(f, "{list}/"),
            Self::ListCue { list, cue } => write!(f, "{list}/{cue}"),
        }
    }
}

/// `Ok(None)` for an empty or zero part
fn parse_part(part: &str, text: &str) -> Result<Option<f64>> {
    let invalid = || Error::InvalidCueAddress(text.to_owned());
    let part = part.trim();
    if part.is_empty() {
        return Ok(None);
    }
    if !part.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid());
    }
    let value: f64 = part.parse().map_err(|_| invalid())?;
    Ok((value > 0.0).then_some(value))
}

/// Parse cue address text straight into an MSC payload
///
/// # Errors
///
/// Returns [`Error::InvalidCueAddress`] if the text does not parse.
pub fn encode_cue_address(text: &str) -> Result<Vec<u8>> {
    CueAddress::parse(text)?.encode()
}
