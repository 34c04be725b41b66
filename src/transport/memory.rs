//! In-process radio medium for tests, benches and loopback setups.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::trace;

use super::address::PeerAddress;
use super::radio::{Radio, RadioError};

/// Record of one accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPacket {
    /// Sending radio.
    pub from: PeerAddress,
    /// Destination passed to `send`.
    pub to: PeerAddress,
    /// Packet bytes.
    pub data: Bytes,
}

/// Shared medium connecting any number of [`MemoryRadio`]s.
///
/// Packets are delivered instantly into the destination's inbox. Sends to
/// addresses with no attached radio are accepted and lost, as on air.
#[derive(Debug, Clone, Default)]
pub struct MemoryAir {
    inner: Arc<Mutex<AirState>>,
}

#[derive(Debug, Default)]
struct AirState {
    inboxes: HashMap<PeerAddress, VecDeque<(PeerAddress, Bytes)>>,
    sent: Vec<SentPacket>,
}

impl MemoryAir {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a radio with the given local address.
    #[must_use]
    pub fn radio(&self, address: PeerAddress) -> MemoryRadio {
        self.lock().inboxes.entry(address).or_default();
        MemoryRadio {
            address,
            air: self.clone(),
            active: false,
            peers: HashSet::new(),
            faults: Faults::default(),
        }
    }

    /// Place a packet directly in `to`'s inbox as if `from` had sent it.
    pub fn inject(&self, from: PeerAddress, to: PeerAddress, data: impl Into<Bytes>) {
        self.lock()
            .inboxes
            .entry(to)
            .or_default()
            .push_back((from, data.into()));
    }

    /// Every send accepted so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentPacket> {
        self.lock().sent.clone()
    }

    /// Number of accepted sends addressed to `address`.
    #[must_use]
    pub fn sends_to(&self, address: &PeerAddress) -> usize {
        self.lock()
            .sent
            .iter()
            .filter(|packet| packet.to == *address)
            .count()
    }

    /// Packets waiting in `address`'s inbox.
    #[must_use]
    pub fn pending(&self, address: &PeerAddress) -> usize {
        self.lock().inboxes.get(address).map_or(0, VecDeque::len)
    }

    /// Forget the send log.
    pub fn clear_log(&self) {
        self.lock().sent.clear();
    }

    fn lock(&self) -> MutexGuard<'_, AirState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_activation: bool,
    refuse_add: bool,
    refuse_del: bool,
    failing_sends: HashSet<PeerAddress>,
}

/// Radio endpoint attached to a [`MemoryAir`], with fault injection.
#[derive(Debug)]
pub struct MemoryRadio {
    address: PeerAddress,
    air: MemoryAir,
    active: bool,
    peers: HashSet<PeerAddress>,
    faults: Faults,
}

impl MemoryRadio {
    /// Local address of this radio.
    #[must_use]
    pub fn address(&self) -> PeerAddress {
        self.address
    }

    /// Whether the radio is switched on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether `address` is bound in the driver's peer table.
    #[must_use]
    pub fn has_peer(&self, address: &PeerAddress) -> bool {
        self.peers.contains(address)
    }

    /// Number of peers bound in the driver's peer table.
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Make `set_active(true)` fail.
    pub fn fail_activation(&mut self, fail: bool) {
        self.faults.fail_activation = fail;
    }

    /// Make `add_peer` fail.
    pub fn refuse_add_peer(&mut self, refuse: bool) {
        self.faults.refuse_add = refuse;
    }

    /// Make `del_peer` fail.
    pub fn refuse_del_peer(&mut self, refuse: bool) {
        self.faults.refuse_del = refuse;
    }

    /// Make every send to `address` fail.
    pub fn fail_sends_to(&mut self, address: PeerAddress) {
        self.faults.failing_sends.insert(address);
    }

    /// Undo [`fail_sends_to`](Self::fail_sends_to).
    pub fn restore_sends_to(&mut self, address: &PeerAddress) {
        self.faults.failing_sends.remove(address);
    }
}

impl Radio for MemoryRadio {
    fn set_active(&mut self, active: bool) -> Result<(), RadioError> {
        if active && self.faults.fail_activation {
            return Err(RadioError::Rejected("activation failed".into()));
        }
        self.active = active;
        Ok(())
    }

    fn add_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        if self.faults.refuse_add {
            return Err(RadioError::Rejected(format!("peer table refused {address}")));
        }
        self.peers.insert(*address);
        Ok(())
    }

    fn del_peer(&mut self, address: &PeerAddress) -> Result<(), RadioError> {
        if self.faults.refuse_del {
            return Err(RadioError::Rejected(format!("peer table refused {address}")));
        }
        if self.peers.remove(address) {
            Ok(())
        } else {
            Err(RadioError::UnknownPeer(*address))
        }
    }

    fn send(&mut self, address: &PeerAddress, data: &[u8]) -> Result<(), RadioError> {
        if !self.active {
            return Err(RadioError::Inactive);
        }
        if !address.is_broadcast() && !self.peers.contains(address) {
            return Err(RadioError::UnknownPeer(*address));
        }
        if self.faults.failing_sends.contains(address) {
            return Err(RadioError::Rejected(format!("send to {address} failed")));
        }

        let data = Bytes::copy_from_slice(data);
        let from = self.address;
        let mut air = self.air.lock();
        air.sent.push(SentPacket {
            from,
            to: *address,
            data: data.clone(),
        });
        for (owner, inbox) in &mut air.inboxes {
            let addressed = if address.is_broadcast() {
                *owner != from
            } else {
                owner == address
            };
            if addressed {
                inbox.push_back((from, data.clone()));
            }
        }
        trace!(from = %from, to = %address, len = data.len(), "memory air send");
        Ok(())
    }

    fn recv(&mut self) -> Option<(PeerAddress, Bytes)> {
        if !self.active {
            return None;
        }
        self.air.lock().inboxes.get_mut(&self.address)?.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PeerAddress = PeerAddress::new([0xA; 6]);
    const B: PeerAddress = PeerAddress::new([0xB; 6]);
    const C: PeerAddress = PeerAddress::new([0xC; 6]);

    #[test]
    fn unicast_delivery() {
        let air = MemoryAir::new();
        let mut a = air.radio(A);
        let mut b = air.radio(B);
        a.set_active(true).unwrap();
        b.set_active(true).unwrap();
        a.add_peer(&B).unwrap();

        a.send(&B, &[0x90, 60, 100]).unwrap();
        assert_eq!(air.pending(&B), 1);
        let (from, data) = b.recv().unwrap();
        assert_eq!(from, A);
        assert_eq!(data.as_ref(), &[0x90, 60, 100]);
        assert!(b.recv().is_none());
    }

    #[test]
    fn send_requires_peer_and_activity() {
        let air = MemoryAir::new();
        let mut a = air.radio(A);
        assert_eq!(a.send(&B, &[0xF8]), Err(RadioError::Inactive));
        a.set_active(true).unwrap();
        assert_eq!(a.send(&B, &[0xF8]), Err(RadioError::UnknownPeer(B)));
    }

    #[test]
    fn broadcast_reaches_everyone_else() {
        let air = MemoryAir::new();
        let mut a = air.radio(A);
        let _b = air.radio(B);
        let _c = air.radio(C);
        a.set_active(true).unwrap();

        a.send(&PeerAddress::BROADCAST, &[0xFA]).unwrap();
        assert_eq!(air.pending(&A), 0);
        assert_eq!(air.pending(&B), 1);
        assert_eq!(air.pending(&C), 1);
    }

    #[test]
    fn injected_faults() {
        let air = MemoryAir::new();
        let mut a = air.radio(A);
        a.set_active(true).unwrap();
        a.add_peer(&B).unwrap();
        a.fail_sends_to(B);
        assert!(matches!(a.send(&B, &[0xF8]), Err(RadioError::Rejected(_))));
        a.restore_sends_to(&B);
        assert!(a.send(&B, &[0xF8]).is_ok());
        assert_eq!(air.sends_to(&B), 1);

        a.refuse_add_peer(true);
        assert!(a.add_peer(&C).is_err());
        a.refuse_del_peer(true);
        assert!(a.del_peer(&B).is_err());
        assert!(a.has_peer(&B));

        a.fail_activation(true);
        assert!(a.set_active(true).is_err());
    }

    #[test]
    fn inactive_radio_hears_nothing() {
        let air = MemoryAir::new();
        let mut a = air.radio(A);
        air.inject(B, A, vec![0xF8]);
        assert!(a.recv().is_none());
        a.set_active(true).unwrap();
        assert!(a.recv().is_some());
    }
}
