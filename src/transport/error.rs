//! Transport-level error types covering peer management and radio failures.

use core::fmt;

use super::address::PeerAddress;
use super::radio::RadioError;
use crate::protocol;

/// Reasons a peer registry mutation was refused.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PeerError {
    /// Registry already holds the configured maximum.
    #[error("peer registry full (capacity {capacity})")]
    CapacityExceeded {
        /// Configured maximum number of peers.
        capacity: usize,
    },
    /// Address is already registered.
    #[error("peer {0} already registered")]
    DuplicatePeer(PeerAddress),
    /// Address was not exactly six bytes.
    #[error("invalid peer address length: expected 6 bytes, got {len}")]
    InvalidAddressLength {
        /// Length of the address supplied by the caller.
        len: usize,
    },
    /// Radio driver refused to bind or unbind the peer.
    #[error("radio rejected peer: {0}")]
    RadioRejected(#[source] RadioError),
    /// Transport has not been started with `begin`.
    #[error("transport not active")]
    NotActive,
}

/// Unified error type for transport operations.
#[derive(Debug)]
pub enum TransportError {
    /// Radio driver failure (activation or deactivation).
    Radio(RadioError),
    /// Peer registry failure.
    Peer(PeerError),
    /// Wire format failure.
    Protocol(protocol::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(err) => write!(f, "radio error: {err}"),
            Self::Peer(err) => write!(f, "peer error: {err}"),
            Self::Protocol(err) => write!(f, "protocol error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Radio(err) => Some(err),
            Self::Peer(err) => Some(err),
            Self::Protocol(err) => Some(err),
        }
    }
}

impl From<RadioError> for TransportError {
    fn from(err: RadioError) -> Self {
        Self::Radio(err)
    }
}

impl From<PeerError> for TransportError {
    fn from(err: PeerError) -> Self {
        Self::Peer(err)
    }
}

impl From<protocol::Error> for TransportError {
    fn from(err: protocol::Error) -> Self {
        Self::Protocol(err)
    }
}
