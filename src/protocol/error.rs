//! Wire format error types

use thiserror::Error;

/// Reasons an inbound packet could not be turned into a [`MidiMessage`].
///
/// [`MidiMessage`]: super::MidiMessage
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length packet
    #[error("empty packet")]
    Empty,

    /// First byte is not a status this codec understands
    #[error("unknown status byte: {status:#04x}")]
    UnknownStatus {
        /// Offending status byte
        status: u8,
    },

    /// SysEx container declares more payload than it can hold
    #[error("invalid sysex length: {declared} bytes (max {max})")]
    InvalidSysExLength {
        /// Length byte found in the container
        declared: usize,
        /// Container payload capacity
        max: usize,
    },

    /// Buffer handed to the SysEx decoder is not a full container
    #[error("sysex packet size mismatch: expected {expected} bytes, got {got}")]
    SysExPacketSize {
        /// Fixed container size
        expected: usize,
        /// Actual size
        got: usize,
    },
}

/// Protocol errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Inbound packet could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// SysEx payload does not fit in one container
    #[error("sysex payload too large: {len} bytes (max {max})")]
    SysExTooLarge {
        /// Payload size
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Peer address is not exactly 6 bytes
    #[error("invalid address length: expected 6 bytes, got {len}")]
    InvalidAddressLength {
        /// Provided length
        len: usize,
    },

    /// Peer address string is not `XX:XX:XX:XX:XX:XX`
    #[error("invalid address format: {0:?}")]
    InvalidAddressFormat(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
