//! Bounded, ordered, deduplicated set of peer addresses.

use tracing::{debug, warn};

use super::address::PeerAddress;
use super::error::PeerError;
use super::radio::Radio;

/// Default maximum number of registered peers.
pub const DEFAULT_MAX_PEERS: usize = 20;

/// Registered peers in insertion order.
///
/// Every mutation is mirrored to the radio driver's peer table. Adds are
/// atomic: if the driver refuses, the registry is left untouched.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    capacity: usize,
    peers: Vec<PeerAddress>,
}

impl PeerRegistry {
    /// Construct an empty registry holding at most `capacity` peers.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            peers: Vec::with_capacity(capacity.min(DEFAULT_MAX_PEERS)),
        }
    }

    /// Register a peer with the radio and append it.
    pub fn add<R: Radio + ?Sized>(
        &mut self,
        radio: &mut R,
        address: PeerAddress,
    ) -> Result<(), PeerError> {
        if self.is_full() {
            debug!(peer = %address, capacity = self.capacity, "peer registry full");
            return Err(PeerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.contains(&address) {
            debug!(peer = %address, "peer already registered");
            return Err(PeerError::DuplicatePeer(address));
        }

        radio.add_peer(&address).map_err(|err| {
            warn!(peer = %address, error = %err, "radio refused peer");
            PeerError::RadioRejected(err)
        })?;
        self.peers.push(address);
        debug!(peer = %address, total = self.peers.len(), "peer added");
        Ok(())
    }

    /// Unregister a peer from the radio and the registry.
    ///
    /// Returns `false` if the peer was not registered, or if the radio
    /// refused to drop it (the peer then stays registered).
    pub fn remove<R: Radio + ?Sized>(&mut self, radio: &mut R, address: &PeerAddress) -> bool {
        let Some(index) = self.position(address) else {
            return false;
        };
        if let Err(err) = radio.del_peer(address) {
            warn!(peer = %address, error = %err, "radio refused peer removal");
            return false;
        }
        self.peers.remove(index);
        debug!(peer = %address, total = self.peers.len(), "peer removed");
        true
    }

    /// Remove every peer, one at a time.
    ///
    /// Radio failures are logged and skipped; the registry always ends up
    /// empty. Returns how many peers the radio refused to drop.
    pub fn clear<R: Radio + ?Sized>(&mut self, radio: &mut R) -> usize {
        let mut refused = 0;
        for address in self.peers.drain(..) {
            if let Err(err) = radio.del_peer(&address) {
                warn!(peer = %address, error = %err, "radio refused peer removal during clear");
                refused += 1;
            }
        }
        refused
    }

    /// Check whether an address is registered.
    #[must_use]
    pub fn contains(&self, address: &PeerAddress) -> bool {
        self.peers.contains(address)
    }

    /// Index of an address in insertion order.
    #[must_use]
    pub fn position(&self, address: &PeerAddress) -> Option<usize> {
        self.peers.iter().position(|peer| peer == address)
    }

    /// Peer at `index`, in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PeerAddress> {
        self.peers.get(index)
    }

    /// Iterate peers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PeerAddress> {
        self.peers.iter()
    }

    /// Returns number of registered peers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.peers.len()
    }

    /// Determine whether no peers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Determine whether another peer would exceed capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.peers.len() >= self.capacity
    }

    /// Configured maximum number of peers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PEERS)
    }
}

impl<'a> IntoIterator for &'a PeerRegistry {
    type Item = &'a PeerAddress;
    type IntoIter = std::slice::Iter<'a, PeerAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.iter()
    }
}
