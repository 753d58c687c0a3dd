//! MSC command frames and the command catalogues

use std::fmt;

use crate::protocol::{Error, Result, Status};

/// Universal real-time SysEx id
pub const UNIVERSAL_REAL_TIME: u8 = 0x7F;

/// Sub-id #1 identifying MIDI Show Control
pub const MSC_SUB_ID: u8 = 0x02;

/// Device id addressing every device
pub const ALL_CALL_DEVICE: u8 = 0x7F;

/// Build an MSC command frame
///
/// # Format
///
/// ```text
/// F0 7F <device_id> 02 <command_format> <command> <payload..> F7
/// ```
#[must_use]
pub fn build_command(device_id: u8, command_format: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 7);
    frame.push(Status::SYSEX_START);
    frame.push(UNIVERSAL_REAL_TIME);
    frame.push(device_id);
    frame.push(MSC_SUB_ID);
    frame.push(command_format);
    frame.push(command);
    frame.extend_from_slice(payload);
    frame.push(Status::SYSEX_END);
    frame
}

/// Parse hex data entry such as `"31 2E 35 00"` or `"312E3500"`
///
/// Spaces are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidHexPayload`] on an odd digit count or a non-hex digit.
pub fn parse_hex_payload(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| *b != b' ').collect();
    let invalid = || Error::InvalidHexPayload(text.to_owned());

    if digits.len() % 2 != 0 {
        return Err(invalid());
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let high = hex_value(pair[0]).ok_or_else(invalid)?;
            let low = hex_value(pair[1]).ok_or_else(invalid)?;
            Ok((high << 4) | low)
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit)
        .to_digit(16)
        .and_then(|value| u8::try_from(value).ok())
}

/// Render bytes as space-separated uppercase hex, e.g. `"F0 7F 01"`
#[must_use]
pub fn render_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

macro_rules! catalogue {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every entry in wire-value order
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Convert from byte
            #[must_use]
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Convert to byte
            #[must_use]
            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            /// Upper-case name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            /// `NAME (HH)`, as shown in command pickers
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} ({:02X})", self.name(), self.as_u8())
            }
        }
    };
}

catalogue! {
    /// MSC command format (target device class)
    CommandFormat {
        /// General lighting
        Lighting = 0x01 => "LIGHTING",
        /// Moving lights
        MovingLights = 0x02 => "MOVING_LIGHTS",
        /// Colour changers
        ColourChangers = 0x03 => "COLOUR_CHANGERS",
        /// Strobes
        Strobes = 0x04 => "STROBES",
        /// Lasers
        Lasers = 0x05 => "LASERS",
        /// Chasers
        Chasers = 0x06 => "CHASERS",
        /// General sound
        Sound = 0x10 => "SOUND",
        /// Music
        Music = 0x11 => "MUSIC",
        /// CD players
        CdPlayers = 0x12 => "CD_PLAYERS",
        /// EPROM playback
        EpromPlayback = 0x13 => "EPROM_PLAYBACK",
        /// Audio tape machines
        AudioTapeMachines = 0x14 => "AUDIO_TAPE_MACHINES",
        /// Intercoms
        Intercoms = 0x15 => "INTERCOMS",
        /// Amplifiers
        Amplifiers = 0x16 => "AMPLIFIERS",
        /// Audio effects devices
        AudioEffects = 0x17 => "AUDIO_EFFECTS",
        /// Equalisers
        Equalisers = 0x18 => "EQUALISERS",
        /// General machinery
        Machinery = 0x20 => "MACHINERY",
        /// Rigging
        Rigging = 0x21 => "RIGGING",
        /// Flys
        Flys = 0x22 => "FLYS",
        /// Lifts
        Lifts = 0x23 => "LIFTS",
        /// Turntables
        Turntables = 0x24 => "TURNTABLES",
        /// Trusses
        Trusses = 0x25 => "TRUSSES",
        /// Robots
        Robots = 0x26 => "ROBOTS",
        /// Animation
        Animation = 0x27 => "ANIMATION",
        /// Floats
        Floats = 0x28 => "FLOATS",
        /// Breakaways
        Breakaways = 0x29 => "BREAKAWAYS",
        /// Barges
        Barges = 0x2A => "BARGES",
        /// General video
        Video = 0x30 => "VIDEO",
        /// Video tape machines
        VideoTapeMachines = 0x31 => "VIDEO_TAPE_MACHINES",
        /// Video cassette machines
        VideoCassetteMachines = 0x32 => "VIDEO_CASSETTE_MACHINES",
        /// Video disc players
        VideoDiscPlayers = 0x33 => "VIDEO_DISC_PLAYERS",
        /// Video switchers
        VideoSwitchers = 0x34 => "VIDEO_SWITCHERS",
        /// Video effects
        VideoEffects = 0x35 => "VIDEO_EFFECTS",
        /// Video character generators
        VideoCharacterGenerators = 0x36 => "VIDEO_CHARACTER_GENERATORS",
        /// Video still stores
        VideoStillStores = 0x37 => "VIDEO_STILL_STORES",
        /// Video monitors
        VideoMonitors = 0x38 => "VIDEO_MONITORS",
        /// General projection
        Projection = 0x40 => "PROJECTION",
        /// Film projectors
        FilmProjectors = 0x41 => "FILM_PROJECTORS",
        /// Slide projectors
        SlideProjectors = 0x42 => "SLIDE_PROJECTORS",
        /// Video projectors
        VideoProjectors = 0x43 => "VIDEO_PROJECTORS",
        /// Dissolvers
        Dissolvers = 0x44 => "DISSOLVERS",
        /// Shutter controls
        ShutterControls = 0x45 => "SHUTTER_CONTROLS",
        /// General process control
        ProcessControl = 0x50 => "PROCESS_CONTROL",
        /// Hydraulic oil
        HydraulicOil = 0x51 => "HYDRAULIC_OIL",
        /// Water
        Water = 0x52 => "H2O",
        /// Carbon dioxide
        CarbonDioxide = 0x53 => "CO2",
        /// Compressed air
        CompressedAir = 0x54 => "COMPRESSED_AIR",
        /// Natural gas
        NaturalGas = 0x55 => "NATURAL_GAS",
        /// Fog
        Fog = 0x56 => "FOG",
        /// Smoke
        Smoke = 0x57 => "SMOKE",
        /// Cracked haze
        CrackedHaze = 0x58 => "CRACKED_HAZE",
        /// General pyrotechnics
        Pyro = 0x60 => "PYRO",
        /// Fireworks
        Fireworks = 0x61 => "FIREWORKS",
        /// Explosions
        Explosions = 0x62 => "EXPLOSIONS",
        /// Flame
        Flame = 0x63 => "FLAME",
        /// Smoke pots
        SmokePots = 0x64 => "SMOKE_POTS",
        /// Every device class
        AllTypes = 0x7F => "ALL_TYPES",
    }
}

catalogue! {
    /// MSC command
    MscCommand {
        /// Go
        Go = 0x01 => "GO",
        /// Stop
        Stop = 0x02 => "STOP",
        /// Resume
        Resume = 0x03 => "RESUME",
        /// Timed go
        TimedGo = 0x04 => "TIMED_GO",
        /// Load
        Load = 0x05 => "LOAD",
        /// Set
        Set = 0x06 => "SET",
        /// Fire
        Fire = 0x07 => "FIRE",
        /// All off
        AllOff = 0x08 => "ALL_OFF",
        /// Restore
        Restore = 0x09 => "RESTORE",
        /// Reset
        Reset = 0x0A => "RESET",
        /// Go off
        GoOff = 0x0B => "GO_OFF",
        /// Go / jam clock
        GoJamClock = 0x10 => "GO_JAM_CLOCK",
        /// Standby +
        StandbyPlus = 0x11 => "STANDBY_PLUS",
        /// Standby -
        StandbyMinus = 0x12 => "STANDBY_MINUS",
        /// Sequence +
        SequencePlus = 0x13 => "SEQUENCE_PLUS",
        /// Sequence -
        SequenceMinus = 0x14 => "SEQUENCE_MINUS",
        /// Start clock
        StartClock = 0x15 => "START_CLOCK",
        /// Stop clock
        StopClock = 0x16 => "STOP_CLOCK",
        /// Zero clock
        ZeroClock = 0x17 => "ZERO_CLOCK",
        /// Set clock
        SetClock = 0x18 => "SET_CLOCK",
        /// MTC chase on
        MtcChaseOn = 0x19 => "MTC_CHASE_ON",
        /// MTC chase off
        MtcChaseOff = 0x1A => "MTC_CHASE_OFF",
        /// Open cue list
        OpenCueList = 0x1B => "OPEN_CUE_LIST",
        /// Close cue list
        CloseCueList = 0x1C => "CLOSE_CUE_LIST",
        /// Open cue path
        OpenCuePath = 0x1D => "OPEN_CUE_PATH",
        /// Close cue path
        CloseCuePath = 0x1E => "CLOSE_CUE_PATH",
    }
}
