//! MIDI-over-radio wire format
//!
//! This module provides the status table, message types, and packet codec.

mod codec;
mod error;
pub(crate) mod metrics;
mod message;
mod mpe;
mod types;

pub use codec::{Packet, decode, decode_sysex, encode};
pub use error::{DecodeError, Error, Result};
pub use message::{MidiMessage, SysExMessage};
pub use metrics::MetricsSnapshot;
pub use mpe::MpeChannelAllocator;
pub use types::MidiStatus;

/// Largest packet carrying a plain (non-SysEx) MIDI message.
pub const MAX_SHORT_PACKET_SIZE: usize = 3;

/// Capacity of the SysEx payload area.
pub const SYSEX_MAX_PAYLOAD: usize = 128;

/// Fixed SysEx container size: payload area plus one trailing length byte.
pub const SYSEX_PACKET_SIZE: usize = SYSEX_MAX_PAYLOAD + 1;

/// Mask applied to every 7-bit data byte.
pub const DATA_MASK: u8 = 0x7F;

/// Mask applied to 14-bit values (pitch bend, song position).
pub const VALUE_14BIT_MASK: u16 = 0x3FFF;

/// Raw pitch bend value meaning "no bend".
pub const PITCH_BEND_CENTER: u16 = 8192;

/// Lowest signed pitch bend value.
pub const PITCH_BEND_MIN: i16 = -8192;

/// Highest signed pitch bend value.
pub const PITCH_BEND_MAX: i16 = 8191;
