//! MIDI packet codec (encode/decode)
//!
//! Every message maps to the shortest packet its status allows. The layout is
//! shared with the native firmware and must stay bit-exact.

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    DATA_MASK, DecodeError, MAX_SHORT_PACKET_SIZE, MidiMessage, MidiStatus, SYSEX_MAX_PAYLOAD,
    SYSEX_PACKET_SIZE, SysExMessage, VALUE_14BIT_MASK,
};

/// Encoded wire packet: 1 to 3 bytes, or a 129-byte SysEx container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet(Bytes);

impl Packet {
    /// Packet length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the packet holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// First byte of the packet
    #[must_use]
    pub fn status_byte(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Consume the packet, returning the shared buffer
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Packet> for Bytes {
    fn from(packet: Packet) -> Self {
        packet.0
    }
}

/// Encode a message to its packet
///
/// # Format
///
/// ```text
/// channel voice: [status | (channel - 1)] [data1 & 0x7F]? [data2 & 0x7F]?
/// system:        [status] [data1 & 0x7F]? [data2 & 0x7F]?
/// sysex:         [payload (128, zero-filled)] [length (1)]
/// ```
///
/// 14-bit values are split LSB first. Nothing is rejected: out-of-range
/// data is masked.
#[must_use]
pub fn encode(message: &MidiMessage) -> Packet {
    let status = message.status();
    match message {
        MidiMessage::NoteOff {
            channel,
            note,
            velocity,
        }
        | MidiMessage::NoteOn {
            channel,
            note,
            velocity,
        } => channel_packet(status, *channel, &[*note, *velocity]),
        MidiMessage::PolyAftertouch {
            channel,
            note,
            pressure,
        } => channel_packet(status, *channel, &[*note, *pressure]),
        MidiMessage::ControlChange {
            channel,
            control,
            value,
        } => channel_packet(status, *channel, &[*control, *value]),
        MidiMessage::ProgramChange { channel, program } => {
            channel_packet(status, *channel, &[*program])
        }
        MidiMessage::ChannelAftertouch { channel, pressure } => {
            channel_packet(status, *channel, &[*pressure])
        }
        MidiMessage::PitchBend { channel, value } => {
            channel_packet(status, *channel, &split_14bit(*value))
        }
        MidiMessage::TimeCode { value } => system_packet(status, &[*value]),
        MidiMessage::SongSelect { song } => system_packet(status, &[*song]),
        MidiMessage::SongPosition { position } => system_packet(status, &split_14bit(*position)),
        MidiMessage::TuneRequest
        | MidiMessage::Clock
        | MidiMessage::Start
        | MidiMessage::Continue
        | MidiMessage::Stop
        | MidiMessage::ActiveSensing
        | MidiMessage::SystemReset => system_packet(status, &[]),
        MidiMessage::SysEx(sysex) => sysex_packet(sysex),
    }
}

/// Decode a message from packet bytes
///
/// Packets longer than three bytes are SysEx containers. Shorter packets
/// are read by status: missing trailing data bytes default to 0 and extra
/// bytes beyond the status's size are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The packet is empty
/// - The status byte is a data byte or an undefined system status
/// - A SysEx container is malformed
pub fn decode(bytes: &[u8]) -> Result<MidiMessage, DecodeError> {
    let Some(&status_byte) = bytes.first() else {
        return Err(DecodeError::Empty);
    };

    if bytes.len() > MAX_SHORT_PACKET_SIZE {
        return decode_sysex(bytes).map(MidiMessage::SysEx);
    }

    let unknown = DecodeError::UnknownStatus {
        status: status_byte,
    };
    let status = MidiStatus::from_u8(status_byte).ok_or(unknown)?;

    let data1 = data_byte(bytes, 1);
    let data2 = data_byte(bytes, 2);
    let channel = (status_byte & 0x0F) + 1;

    let message = match status {
        MidiStatus::NoteOff => MidiMessage::NoteOff {
            channel,
            note: data1,
            velocity: data2,
        },
        MidiStatus::NoteOn => MidiMessage::NoteOn {
            channel,
            note: data1,
            velocity: data2,
        },
        MidiStatus::PolyAftertouch => MidiMessage::PolyAftertouch {
            channel,
            note: data1,
            pressure: data2,
        },
        MidiStatus::ControlChange => MidiMessage::ControlChange {
            channel,
            control: data1,
            value: data2,
        },
        MidiStatus::ProgramChange => MidiMessage::ProgramChange {
            channel,
            program: data1,
        },
        MidiStatus::ChannelAftertouch => MidiMessage::ChannelAftertouch {
            channel,
            pressure: data1,
        },
        MidiStatus::PitchBend => MidiMessage::PitchBend {
            channel,
            value: join_14bit(data1, data2),
        },
        MidiStatus::TimeCode => MidiMessage::TimeCode { value: data1 },
        MidiStatus::SongPosition => MidiMessage::SongPosition {
            position: join_14bit(data1, data2),
        },
        MidiStatus::SongSelect => MidiMessage::SongSelect { song: data1 },
        MidiStatus::TuneRequest => MidiMessage::TuneRequest,
        MidiStatus::Clock => MidiMessage::Clock,
        MidiStatus::Start => MidiMessage::Start,
        MidiStatus::Continue => MidiMessage::Continue,
        MidiStatus::Stop => MidiMessage::Stop,
        MidiStatus::ActiveSensing => MidiMessage::ActiveSensing,
        MidiStatus::SystemReset => MidiMessage::SystemReset,
        // a bare 0xF0 is not a container
        MidiStatus::SysEx => return Err(unknown),
    };

    Ok(message)
}

/// Decode a fixed-size SysEx container
///
/// # Errors
///
/// Returns an error if the buffer is not exactly [`SYSEX_PACKET_SIZE`] bytes
/// or the trailing length byte exceeds [`SYSEX_MAX_PAYLOAD`].
pub fn decode_sysex(bytes: &[u8]) -> Result<SysExMessage, DecodeError> {
    if bytes.len() != SYSEX_PACKET_SIZE {
        return Err(DecodeError::SysExPacketSize {
            expected: SYSEX_PACKET_SIZE,
            got: bytes.len(),
        });
    }

    let declared = usize::from(bytes[SYSEX_MAX_PAYLOAD]);
    if declared > SYSEX_MAX_PAYLOAD {
        return Err(DecodeError::InvalidSysExLength {
            declared,
            max: SYSEX_MAX_PAYLOAD,
        });
    }

    Ok(SysExMessage::from_container(Bytes::copy_from_slice(
        &bytes[..declared],
    )))
}

/// Build a channel voice packet; channel 1..=16 lands in the low nibble.
fn channel_packet(status: MidiStatus, channel: u8, data: &[u8]) -> Packet {
    let channel_bits = channel.wrapping_sub(1) & 0x0F;
    short_packet(status.as_u8() | channel_bits, data)
}

fn system_packet(status: MidiStatus, data: &[u8]) -> Packet {
    short_packet(status.as_u8(), data)
}

fn short_packet(status_byte: u8, data: &[u8]) -> Packet {
    debug_assert!(data.len() < MAX_SHORT_PACKET_SIZE);
    let mut buf = [0u8; MAX_SHORT_PACKET_SIZE];
    buf[0] = status_byte;
    for (slot, byte) in buf[1..].iter_mut().zip(data) {
        *slot = byte & DATA_MASK;
    }
    Packet(Bytes::copy_from_slice(&buf[..=data.len()]))
}

fn sysex_packet(sysex: &SysExMessage) -> Packet {
    let payload = sysex.payload();
    let len = payload.len().min(SYSEX_MAX_PAYLOAD);
    let mut buf = BytesMut::with_capacity(SYSEX_PACKET_SIZE);
    buf.put_slice(&payload[..len]);
    buf.put_bytes(0, SYSEX_MAX_PAYLOAD - len);
    buf.put_u8(u8::try_from(len).unwrap_or(u8::MAX));
    Packet(buf.freeze())
}

/// Split a 14-bit value into `[lsb, msb]`, 7 bits each.
fn split_14bit(value: u16) -> [u8; 2] {
    let value = value & VALUE_14BIT_MASK;
    [(value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
}

fn join_14bit(lsb: u8, msb: u8) -> u16 {
    (u16::from(msb) << 7) | u16::from(lsb)
}

fn data_byte(bytes: &[u8], index: usize) -> u8 {
    bytes.get(index).copied().unwrap_or(0) & DATA_MASK
}
