//! MIDI message model

use bytes::Bytes;

use super::{
    DecodeError, Error, MidiStatus, PITCH_BEND_CENTER, PITCH_BEND_MAX, PITCH_BEND_MIN, Packet,
    Result, SYSEX_MAX_PAYLOAD, VALUE_14BIT_MASK,
};

/// A single MIDI event as carried by one radio packet.
///
/// Channels are user-facing (1..=16). Data fields are stored as given and
/// masked to 7 bits (14 bits for pitch bend and song position) when the
/// message is encoded, so out-of-range values are truncated, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidiMessage {
    /// Note released
    NoteOff {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Note number
        note: u8,
        /// Release velocity
        velocity: u8,
    },
    /// Note pressed
    NoteOn {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Note number
        note: u8,
        /// Strike velocity
        velocity: u8,
    },
    /// Per-key pressure
    PolyAftertouch {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Note number
        note: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// Controller change
    ControlChange {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Controller number
        control: u8,
        /// Controller value
        value: u8,
    },
    /// Program change
    ProgramChange {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Program number
        program: u8,
    },
    /// Channel pressure
    ChannelAftertouch {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// Pitch wheel, raw 14-bit value (8192 = center)
    PitchBend {
        /// MIDI channel (1..=16)
        channel: u8,
        /// Raw bend value (0..=16383)
        value: u16,
    },
    /// MTC quarter frame
    TimeCode {
        /// Quarter frame data
        value: u8,
    },
    /// Song position pointer, in MIDI beats
    SongPosition {
        /// 14-bit position
        position: u16,
    },
    /// Song select
    SongSelect {
        /// Song number
        song: u8,
    },
    /// Tune request
    TuneRequest,
    /// Timing clock
    Clock,
    /// Transport start
    Start,
    /// Transport continue
    Continue,
    /// Transport stop
    Stop,
    /// Active sensing
    ActiveSensing,
    /// System reset
    SystemReset,
    /// System exclusive payload
    SysEx(SysExMessage),
}

impl MidiMessage {
    /// Note On
    #[must_use]
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    /// Note Off
    #[must_use]
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::NoteOff {
            channel,
            note,
            velocity,
        }
    }

    /// Control Change
    #[must_use]
    pub const fn control_change(channel: u8, control: u8, value: u8) -> Self {
        Self::ControlChange {
            channel,
            control,
            value,
        }
    }

    /// Program Change
    #[must_use]
    pub const fn program_change(channel: u8, program: u8) -> Self {
        Self::ProgramChange { channel, program }
    }

    /// Channel (mono) aftertouch
    #[must_use]
    pub const fn channel_aftertouch(channel: u8, pressure: u8) -> Self {
        Self::ChannelAftertouch { channel, pressure }
    }

    /// Polyphonic aftertouch
    #[must_use]
    pub const fn poly_aftertouch(channel: u8, note: u8, pressure: u8) -> Self {
        Self::PolyAftertouch {
            channel,
            note,
            pressure,
        }
    }

    /// Pitch bend from a signed value where 0 is center.
    ///
    /// The value is clamped to `-8192..=8191` before translation to raw.
    #[must_use]
    pub fn pitch_bend(channel: u8, value: i16) -> Self {
        let clamped = i32::from(value).clamp(i32::from(PITCH_BEND_MIN), i32::from(PITCH_BEND_MAX));
        let raw = clamped + i32::from(PITCH_BEND_CENTER);
        Self::PitchBend {
            channel,
            // clamped + 8192 is always within 0..=16383
            value: raw as u16,
        }
    }

    /// Pitch bend from a raw value where 8192 is center; masked to 14 bits.
    #[must_use]
    pub const fn pitch_bend_raw(channel: u8, value: u16) -> Self {
        Self::PitchBend {
            channel,
            value: value & VALUE_14BIT_MASK,
        }
    }

    /// Song position pointer; masked to 14 bits.
    #[must_use]
    pub const fn song_position(position: u16) -> Self {
        Self::SongPosition {
            position: position & VALUE_14BIT_MASK,
        }
    }

    /// Song select
    #[must_use]
    pub const fn song_select(song: u8) -> Self {
        Self::SongSelect { song }
    }

    /// MTC quarter frame
    #[must_use]
    pub const fn time_code(value: u8) -> Self {
        Self::TimeCode { value }
    }

    /// Status class of this message
    #[must_use]
    pub const fn status(&self) -> MidiStatus {
        match self {
            Self::NoteOff { .. } => MidiStatus::NoteOff,
            Self::NoteOn { .. } => MidiStatus::NoteOn,
            Self::PolyAftertouch { .. } => MidiStatus::PolyAftertouch,
            Self::ControlChange { .. } => MidiStatus::ControlChange,
            Self::ProgramChange { .. } => MidiStatus::ProgramChange,
            Self::ChannelAftertouch { .. } => MidiStatus::ChannelAftertouch,
            Self::PitchBend { .. } => MidiStatus::PitchBend,
            Self::TimeCode { .. } => MidiStatus::TimeCode,
            Self::SongPosition { .. } => MidiStatus::SongPosition,
            Self::SongSelect { .. } => MidiStatus::SongSelect,
            Self::TuneRequest => MidiStatus::TuneRequest,
            Self::Clock => MidiStatus::Clock,
            Self::Start => MidiStatus::Start,
            Self::Continue => MidiStatus::Continue,
            Self::Stop => MidiStatus::Stop,
            Self::ActiveSensing => MidiStatus::ActiveSensing,
            Self::SystemReset => MidiStatus::SystemReset,
            Self::SysEx(_) => MidiStatus::SysEx,
        }
    }

    /// User-facing channel for channel voice messages
    #[must_use]
    pub const fn channel(&self) -> Option<u8> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::PolyAftertouch { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelAftertouch { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Signed pitch bend (`raw - 8192`), if this is a pitch bend
    #[must_use]
    pub fn signed_pitch_bend(&self) -> Option<i16> {
        match self {
            Self::PitchBend { value, .. } => Some(raw_to_signed(*value)),
            _ => None,
        }
    }

    /// Encode message to a packet
    #[must_use]
    pub fn encode(&self) -> Packet {
        super::encode(self)
    }

    /// Decode message from packet bytes
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        super::decode(bytes)
    }
}

fn raw_to_signed(raw: u16) -> i16 {
    // 14-bit raw minus center always fits in i16
    (i32::from(raw & VALUE_14BIT_MASK) - i32::from(PITCH_BEND_CENTER)) as i16
}

/// System exclusive payload, at most [`SYSEX_MAX_PAYLOAD`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSysEx"))]
pub struct SysExMessage {
    payload: Bytes,
}

/// Unchecked wire shape; deserialization goes through [`SysExMessage::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSysEx {
    payload: Bytes,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSysEx> for SysExMessage {
    type Error = Error;

    fn try_from(raw: RawSysEx) -> Result<Self> {
        Self::new(raw.payload)
    }
}

impl SysExMessage {
    /// Wrap a payload, rejecting anything that does not fit one container.
    pub fn new(payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > SYSEX_MAX_PAYLOAD {
            return Err(Error::SysExTooLarge {
                len: payload.len(),
                max: SYSEX_MAX_PAYLOAD,
            });
        }
        Ok(Self { payload })
    }

    /// Wrap a payload already known to fit (decoded from a container).
    pub(crate) fn from_container(payload: Bytes) -> Self {
        debug_assert!(payload.len() <= SYSEX_MAX_PAYLOAD);
        Self { payload }
    }

    /// Get payload
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<SysExMessage> for MidiMessage {
    fn from(message: SysExMessage) -> Self {
        Self::SysEx(message)
    }
}
