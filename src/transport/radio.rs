//! Seam to the connectionless radio driver.

use bytes::Bytes;

use super::address::PeerAddress;

/// Errors reported by a radio driver.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RadioError {
    /// Radio is not active.
    #[error("radio inactive")]
    Inactive,
    /// Peer was never registered with the driver.
    #[error("unknown peer {0}")]
    UnknownPeer(PeerAddress),
    /// Driver refused the operation.
    #[error("radio rejected operation: {0}")]
    Rejected(String),
}

/// Connectionless, unreliable, one-shot radio link.
///
/// Every call is synchronous. `recv` never blocks: `None` means nothing is
/// pending right now.
pub trait Radio {
    /// Turn the radio on or off.
    fn set_active(&mut self, active: bool) -> Result<(), RadioError>;

    /// Bind the driver to a peer so that sends to it are permitted.
    fn add_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError>;

    /// Unbind a peer. Drivers without peer tables can keep the default.
    fn del_peer(&mut self, _address: &PeerAddress) -> Result<(), RadioError> {
        Ok(())
    }

    /// Send one packet to one peer.
    fn send(&mut self, address: &PeerAddress, data: &[u8]) -> Result<(), RadioError>;

    /// Take the next pending inbound packet, if any.
    fn recv(&mut self) -> Option<(PeerAddress, Bytes)>;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    fn set_active(&mut self, active: bool) -> Result<(), RadioError> {
        (**self).set_active(active)
    }

    fn add_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        (**self).add_peer(address)
    }

    fn del_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        (**self).del_peer(address)
    }

    fn send(&mut self, address: &PeerAddress, data: &[u8]) -> Result<(), RadioError> {
        (**self).send(address, data)
    }

    fn recv(&mut self) -> Option<(PeerAddress, Bytes)> {
        (**self).recv()
    }
}

impl<R: Radio + ?Sized> Radio for Box<R> {
    fn set_active(&mut self, active: bool) -> Result<(), RadioError> {
        (**self).set_active(active)
    }

    fn add_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        (**self).add_peer(address)
    }

    fn del_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        (**self).del_peer(address)
    }

    fn send(&mut self, address: &PeerAddress, data: &[u8]) -> Result<(), RadioError> {
        (**self).send(address, data)
    }

    fn recv(&mut self) -> Option<(PeerAddress, Bytes)> {
        (**self).recv()
    }
}
