//! MIDI status table

use std::fmt;

/// MIDI status classes carried in the first packet byte.
///
/// Channel voice statuses occupy the high nibble only; the channel is OR'd
/// into the low nibble at encode time. System statuses are full bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MidiStatus {
    /// Note released
    NoteOff = 0x80,
    /// Note pressed
    NoteOn = 0x90,
    /// Per-key pressure
    PolyAftertouch = 0xA0,
    /// Controller change
    ControlChange = 0xB0,
    /// Program (patch) change
    ProgramChange = 0xC0,
    /// Channel pressure
    ChannelAftertouch = 0xD0,
    /// Pitch wheel
    PitchBend = 0xE0,

    /// System exclusive
    SysEx = 0xF0,
    /// MTC quarter frame
    TimeCode = 0xF1,
    /// Song position pointer
    SongPosition = 0xF2,
    /// Song select
    SongSelect = 0xF3,
    /// Tune request
    TuneRequest = 0xF6,

    /// Timing clock
    Clock = 0xF8,
    /// Transport start
    Start = 0xFA,
    /// Transport continue
    Continue = 0xFB,
    /// Transport stop
    Stop = 0xFC,
    /// Active sensing keep-alive
    ActiveSensing = 0xFE,
    /// System reset
    SystemReset = 0xFF,
}

impl MidiStatus {
    /// Classify a raw status byte.
    ///
    /// Channel voice bytes are matched on their high nibble, so `0x93`
    /// yields [`MidiStatus::NoteOn`]. Data bytes and undefined system
    /// statuses yield `None`.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        if value < 0xF0 {
            return match value & 0xF0 {
                0x80 => Some(Self::NoteOff),
                0x90 => Some(Self::NoteOn),
                0xA0 => Some(Self::PolyAftertouch),
                0xB0 => Some(Self::ControlChange),
                0xC0 => Some(Self::ProgramChange),
                0xD0 => Some(Self::ChannelAftertouch),
                0xE0 => Some(Self::PitchBend),
                _ => None,
            };
        }
        match value {
            0xF0 => Some(Self::SysEx),
            0xF1 => Some(Self::TimeCode),
            0xF2 => Some(Self::SongPosition),
            0xF3 => Some(Self::SongSelect),
            0xF6 => Some(Self::TuneRequest),
            0xF8 => Some(Self::Clock),
            0xFA => Some(Self::Start),
            0xFB => Some(Self::Continue),
            0xFC => Some(Self::Stop),
            0xFE => Some(Self::ActiveSensing),
            0xFF => Some(Self::SystemReset),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// System statuses carry no channel bits.
    #[must_use]
    pub const fn is_system(self) -> bool {
        self.as_u8() >= 0xF0
    }

    /// Check if this is a realtime status (single byte, no payload)
    #[must_use]
    pub const fn is_realtime(self) -> bool {
        self.as_u8() >= 0xF8
    }

    /// Number of bytes on the wire for this status, status byte included.
    #[must_use]
    pub const fn packet_len(self) -> usize {
        match self {
            Self::NoteOff
            | Self::NoteOn
            | Self::PolyAftertouch
            | Self::ControlChange
            | Self::PitchBend
            | Self::SongPosition => 3,
            Self::ProgramChange | Self::ChannelAftertouch | Self::TimeCode | Self::SongSelect => {
                2
            }
            Self::TuneRequest
            | Self::Clock
            | Self::Start
            | Self::Continue
            | Self::Stop
            | Self::ActiveSensing
            | Self::SystemReset => 1,
            Self::SysEx => super::SYSEX_PACKET_SIZE,
        }
    }
}

impl fmt::Display for MidiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoteOff => "NoteOff",
            Self::NoteOn => "NoteOn",
            Self::PolyAftertouch => "PolyAftertouch",
            Self::ControlChange => "ControlChange",
            Self::ProgramChange => "ProgramChange",
            Self::ChannelAftertouch => "ChannelAftertouch",
            Self::PitchBend => "PitchBend",
            Self::SysEx => "SysEx",
            Self::TimeCode => "TimeCode",
            Self::SongPosition => "SongPosition",
            Self::SongSelect => "SongSelect",
            Self::TuneRequest => "TuneRequest",
            Self::Clock => "Clock",
            Self::Start => "Start",
            Self::Continue => "Continue",
            Self::Stop => "Stop",
            Self::ActiveSensing => "ActiveSensing",
            Self::SystemReset => "SystemReset",
        };
        write!(f, "{name}")
    }
}
