//! Memoizing MSC frame composer
//!
//! The frame is a pure function of the composer's fields. Every setter
//! recomputes it eagerly and the result is kept for display and sending.

use tracing::trace;

use super::command::{CommandFormat, MscCommand, build_command, parse_hex_payload, render_hex};
use super::cue::encode_cue_address;
use crate::protocol::{Error, Result, WireMessage};

/// How the composer interprets its data text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayloadMode {
    /// Raw hex bytes, e.g. `31 00`
    #[default]
    Hex,
    /// Eos cue address, e.g. `4/101.5`
    EosCue,
}

/// Builds MSC frames from editable fields
#[derive(Debug, Clone)]
pub struct MscComposer {
    device_id: u8,
    command_format: u8,
    command: u8,
    mode: PayloadMode,
    data: String,
    payload: Option<Vec<u8>>,
    frame: Option<Vec<u8>>,
}

impl MscComposer {
    /// Composer for `GO` to all lighting devices with empty data
    #[must_use]
    pub fn new() -> Self {
        let mut composer = Self {
            device_id: 0,
            command_format: CommandFormat::Lighting.as_u8(),
            command: MscCommand::Go.as_u8(),
            mode: PayloadMode::Hex,
            data: String::new(),
            payload: Some(Vec::new()),
            frame: None,
        };
        composer.recompute();
        composer
    }

    /// Set the target device id
    pub fn set_device_id(&mut self, device_id: u8) {
        self.device_id = device_id;
        self.recompute();
    }

    /// Set the command format byte
    pub fn set_command_format(&mut self, command_format: impl Into<u8>) {
        self.command_format = command_format.into();
        self.recompute();
    }

    /// Set the command byte
    pub fn set_command(&mut self, command: impl Into<u8>) {
        self.command = command.into();
        self.recompute();
    }

    /// Change how the data text is interpreted and re-parse it
    ///
    /// # Errors
    ///
    /// Returns the parse error if the current data text is invalid in the new mode.
    pub fn set_mode(&mut self, mode: PayloadMode) -> Result<()> {
        self.mode = mode;
        let data = std::mem::take(&mut self.data);
        self.set_data(data)
    }

    /// Replace the data text
    ///
    /// On error the composer holds no frame until valid data is entered.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHexPayload`] in [`PayloadMode::Hex`]
    /// - [`Error::InvalidCueAddress`] in [`PayloadMode::EosCue`]
    pub fn set_data(&mut self, data: impl Into<String>) -> Result<()> {
        self.data = data.into();
        let parsed = match self.mode {
            PayloadMode::Hex => parse_hex_payload(&self.data),
            PayloadMode::EosCue => encode_cue_address(&self.data),
        };
        let result = match parsed {
            Ok(payload) => {
                self.payload = Some(payload);
                Ok(())
            }
            Err(err) => {
                self.payload = None;
                Err(err)
            }
        };
        self.recompute();
        result
    }

    fn recompute(&mut self) {
        self.frame = self.payload.as_deref().map(|payload| {
            build_command(self.device_id, self.command_format, self.command, payload)
        });
        trace!(
            device_id = self.device_id,
            command_format = self.command_format,
            command = self.command,
            valid = self.frame.is_some(),
            "recomputed MSC frame"
        );
    }

    /// Current data text
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Current data mode
    #[must_use]
    pub const fn mode(&self) -> PayloadMode {
        self.mode
    }

    /// Whether the data text currently parses
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.frame.is_some()
    }

    /// Last composed frame, if the data is valid
    #[must_use]
    pub fn frame(&self) -> Option<&[u8]> {
        self.frame.as_deref()
    }

    /// Last composed frame as `F0 7F ..` text
    #[must_use]
    pub fn frame_hex(&self) -> Option<String> {
        self.frame().map(render_hex)
    }

    /// Last composed frame ready for a transmit session
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedMessage`] while the data text is invalid
    /// - [`Error::MessageTooLong`] if the frame exceeds one window entry
    pub fn to_message(&self) -> Result<WireMessage> {
        let frame = self.frame().ok_or(Error::MalformedMessage {
            reason: "MSC data is invalid",
        })?;
        WireMessage::try_from(frame)
    }
}

impl Default for MscComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CommandFormat> for u8 {
    fn from(format: CommandFormat) -> Self {
        format.as_u8()
    }
}

impl From<MscCommand> for u8 {
    fn from(command: MscCommand) -> Self {
        command.as_u8()
    }
}
