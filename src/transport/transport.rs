//! High-level transport facade: peer fan-out on send, polled dispatch on receive.

use bytes::Bytes;
use tracing::{debug, info, instrument, trace, warn};

use crate::protocol::metrics::{BroadcastOutcome, DropReason, Metrics};
use crate::protocol::{self, MAX_SHORT_PACKET_SIZE, MetricsSnapshot, MidiMessage, SysExMessage};

use super::address::PeerAddress;
use super::error::{PeerError, TransportError};
use super::handlers::HandlerTable;
use super::radio::Radio;
use super::registry::{DEFAULT_MAX_PEERS, PeerRegistry};

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// Maximum number of registered peers.
    pub max_peers: usize,
    /// Register unknown senders as peers when their packets arrive.
    pub auto_discovery: bool,
    /// Decode inbound SysEx containers and hand them to the SysEx handler
    /// instead of dropping them.
    pub dispatch_sysex: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_peers: DEFAULT_MAX_PEERS,
            auto_discovery: false,
            dispatch_sysex: false,
        }
    }
}

/// MIDI over a connectionless radio link.
///
/// The transport starts Inactive. [`begin`](Self::begin) switches the radio
/// on; from then on messages are fanned out to every registered peer and
/// [`poll`](Self::poll) drains inbound packets into the handler table.
/// [`deinit`](Self::deinit) drops all peers and switches the radio off.
///
/// Nothing here is thread-safe; the transport is meant to be driven from a
/// single loop.
#[derive(Debug)]
pub struct MidiTransport<R: Radio> {
    radio: R,
    config: TransportConfig,
    registry: PeerRegistry,
    handlers: HandlerTable,
    metrics: Metrics,
    active: bool,
}

impl<R: Radio> MidiTransport<R> {
    /// Wrap a radio. No radio calls are made until [`begin`](Self::begin).
    #[must_use]
    pub fn new(radio: R, config: TransportConfig) -> Self {
        let registry = PeerRegistry::new(config.max_peers);
        Self {
            radio,
            config,
            registry,
            handlers: HandlerTable::new(),
            metrics: Metrics::default(),
            active: false,
        }
    }

    /// Switch the radio on.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Radio`] if the driver fails to activate; the
    /// transport then stays Inactive.
    #[instrument(level = "debug", skip(self))]
    pub fn begin(&mut self) -> Result<(), TransportError> {
        self.radio.set_active(true)?;
        self.active = true;
        info!(
            auto_discovery = self.config.auto_discovery,
            "midi transport active"
        );
        Ok(())
    }

    /// Drop every peer and switch the radio off.
    ///
    /// Best effort: radio refusals are logged and ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn deinit(&mut self) {
        if !self.active {
            return;
        }
        let refused = self.registry.clear(&mut self.radio);
        if refused > 0 {
            warn!(refused, "radio refused some peer removals during shutdown");
        }
        if let Err(err) = self.radio.set_active(false) {
            warn!(error = %err, "radio failed to deactivate");
        }
        self.active = false;
        info!("midi transport inactive");
    }

    /// Whether [`begin`](Self::begin) has succeeded and no
    /// [`deinit`](Self::deinit) followed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Snapshot of the send and receive counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Underlying radio.
    #[must_use]
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Underlying radio, mutably. Changing its peer table behind the
    /// transport's back desynchronises the registry.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Handler table, for installing or clearing callbacks.
    pub fn handlers_mut(&mut self) -> &mut HandlerTable {
        &mut self.handlers
    }

    // Peers

    /// Register a peer.
    ///
    /// # Errors
    ///
    /// [`PeerError::NotActive`] before `begin`, otherwise whatever the
    /// registry reports (capacity, duplicate, radio refusal).
    pub fn add_peer(&mut self, address: PeerAddress) -> Result<(), PeerError> {
        if !self.active {
            return Err(PeerError::NotActive);
        }
        self.registry.add(&mut self.radio, address)
    }

    /// Register a peer from a raw address slice.
    ///
    /// # Errors
    ///
    /// [`PeerError::InvalidAddressLength`] unless `bytes` is six bytes long,
    /// then as [`add_peer`](Self::add_peer).
    pub fn add_peer_bytes(&mut self, bytes: &[u8]) -> Result<(), PeerError> {
        let address = PeerAddress::try_from(bytes)
            .map_err(|_| PeerError::InvalidAddressLength { len: bytes.len() })?;
        self.add_peer(address)
    }

    /// Unregister a peer. Returns whether it was present and removed.
    pub fn remove_peer(&mut self, address: &PeerAddress) -> bool {
        self.active && self.registry.remove(&mut self.radio, address)
    }

    /// Whether `address` is registered.
    #[must_use]
    pub fn contains_peer(&self, address: &PeerAddress) -> bool {
        self.registry.contains(address)
    }

    /// Number of registered peers.
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.registry.count()
    }

    /// Registered peers in insertion order.
    #[must_use]
    pub fn peers(&self) -> &PeerRegistry {
        &self.registry
    }

    /// Unregister every peer, best effort.
    ///
    /// Returns how many peers the radio refused to drop; they are gone from
    /// the registry regardless.
    ///
    /// # Errors
    ///
    /// [`PeerError::NotActive`] before `begin`.
    pub fn clear_peers(&mut self) -> Result<usize, PeerError> {
        if !self.active {
            return Err(PeerError::NotActive);
        }
        Ok(self.registry.clear(&mut self.radio))
    }

    // Transmit

    /// Send `data` to every registered peer.
    ///
    /// Returns `false` without touching the radio when nothing is
    /// registered, otherwise whether at least one peer send was accepted.
    /// Individual failures are logged and skipped.
    pub fn broadcast(&mut self, data: &[u8]) -> bool {
        if !self.active {
            debug!(len = data.len(), "broadcast while inactive");
            return false;
        }
        if self.registry.is_empty() {
            trace!(len = data.len(), "broadcast with no peers");
            self.metrics.record_broadcast(BroadcastOutcome::NoPeers);
            return false;
        }

        let mut sent = 0u64;
        let mut failed = 0u64;
        for peer in &self.registry {
            match self.radio.send(peer, data) {
                Ok(()) => sent += 1,
                Err(err) => {
                    debug!(peer = %peer, error = %err, "send failed");
                    failed += 1;
                }
            }
        }
        self.metrics
            .record_broadcast(BroadcastOutcome::Attempted { sent, failed });
        trace!(len = data.len(), sent, failed, "broadcast");
        sent > 0
    }

    /// Encode and broadcast a message.
    pub fn send_message(&mut self, message: &MidiMessage) -> bool {
        let packet = message.encode();
        self.broadcast(packet.as_bytes())
    }

    /// Note On. Channel is 1..16; data bytes are masked to 7 bits.
    pub fn send_note_on(&mut self, channel: u8, note: u8, velocity: u8) -> bool {
        self.send_message(&MidiMessage::note_on(channel, note, velocity))
    }

    /// Note Off.
    pub fn send_note_off(&mut self, channel: u8, note: u8, velocity: u8) -> bool {
        self.send_message(&MidiMessage::note_off(channel, note, velocity))
    }

    /// Control Change.
    pub fn send_control_change(&mut self, channel: u8, control: u8, value: u8) -> bool {
        self.send_message(&MidiMessage::control_change(channel, control, value))
    }

    /// Program Change.
    pub fn send_program_change(&mut self, channel: u8, program: u8) -> bool {
        self.send_message(&MidiMessage::program_change(channel, program))
    }

    /// Channel aftertouch.
    pub fn send_channel_aftertouch(&mut self, channel: u8, pressure: u8) -> bool {
        self.send_message(&MidiMessage::channel_aftertouch(channel, pressure))
    }

    /// Polyphonic aftertouch.
    pub fn send_poly_aftertouch(&mut self, channel: u8, note: u8, pressure: u8) -> bool {
        self.send_message(&MidiMessage::poly_aftertouch(channel, note, pressure))
    }

    /// Signed pitch bend, clamped to -8192..=8191.
    pub fn send_pitch_bend(&mut self, channel: u8, value: i16) -> bool {
        self.send_message(&MidiMessage::pitch_bend(channel, value))
    }

    /// Raw 14-bit pitch bend (8192 is center).
    pub fn send_pitch_bend_raw(&mut self, channel: u8, value: u16) -> bool {
        self.send_message(&MidiMessage::pitch_bend_raw(channel, value))
    }

    /// Transport start.
    pub fn send_start(&mut self) -> bool {
        self.send_message(&MidiMessage::Start)
    }

    /// Transport stop.
    pub fn send_stop(&mut self) -> bool {
        self.send_message(&MidiMessage::Stop)
    }

    /// Transport continue.
    pub fn send_continue(&mut self) -> bool {
        self.send_message(&MidiMessage::Continue)
    }

    /// Timing clock tick.
    pub fn send_clock(&mut self) -> bool {
        self.send_message(&MidiMessage::Clock)
    }

    /// Active sensing.
    pub fn send_active_sensing(&mut self) -> bool {
        self.send_message(&MidiMessage::ActiveSensing)
    }

    /// System reset.
    pub fn send_system_reset(&mut self) -> bool {
        self.send_message(&MidiMessage::SystemReset)
    }

    /// Tune request.
    pub fn send_tune_request(&mut self) -> bool {
        self.send_message(&MidiMessage::TuneRequest)
    }

    /// Song position pointer, masked to 14 bits.
    pub fn send_song_position(&mut self, position: u16) -> bool {
        self.send_message(&MidiMessage::song_position(position))
    }

    /// Song select.
    pub fn send_song_select(&mut self, song: u8) -> bool {
        self.send_message(&MidiMessage::song_select(song))
    }

    /// MTC quarter frame.
    pub fn send_time_code(&mut self, value: u8) -> bool {
        self.send_message(&MidiMessage::time_code(value))
    }

    /// SysEx payload in the fixed 129-byte container.
    ///
    /// # Errors
    ///
    /// [`protocol::Error::SysExTooLarge`] if the payload exceeds 128 bytes.
    pub fn send_sysex(&mut self, payload: impl Into<Bytes>) -> protocol::Result<bool> {
        let message = SysExMessage::new(payload)?;
        Ok(self.send_message(&MidiMessage::SysEx(message)))
    }

    // Receive

    /// Drain every packet the radio currently holds and dispatch it.
    ///
    /// Never waits for new packets. Returns how many packets were drained.
    #[instrument(level = "trace", skip(self))]
    pub fn poll(&mut self) -> usize {
        if !self.active {
            return 0;
        }
        let mut drained = 0;
        while let Some((sender, data)) = self.radio.recv() {
            self.handle_packet(sender, &data);
            drained += 1;
        }
        if drained > 0 {
            trace!(drained, "poll");
        }
        drained
    }

    /// Process one inbound packet as [`poll`](Self::poll) would.
    ///
    /// Returns whether a handler ran. Packets that cannot be decoded, and
    /// SysEx containers unless enabled in the config, are dropped and only
    /// show up in [`metrics`](Self::metrics). While Inactive the packet is
    /// ignored entirely.
    pub fn handle_packet(&mut self, sender: PeerAddress, data: &[u8]) -> bool {
        if !self.active {
            trace!(peer = %sender, len = data.len(), "packet while inactive");
            return false;
        }
        self.metrics.record_received();

        if self.config.auto_discovery && !self.registry.contains(&sender) {
            match self.registry.add(&mut self.radio, sender) {
                Ok(()) => {
                    debug!(peer = %sender, "peer discovered");
                    self.metrics.record_discovery(true);
                }
                Err(err) => {
                    debug!(peer = %sender, error = %err, "auto-discovery refused");
                    self.metrics.record_discovery(false);
                }
            }
        }

        if data.len() > MAX_SHORT_PACKET_SIZE && !self.config.dispatch_sysex {
            trace!(peer = %sender, len = data.len(), "sysex dropped");
            self.metrics.record_drop(DropReason::SysEx);
            return false;
        }

        let message = match protocol::decode(data) {
            Ok(message) => message,
            Err(err) => {
                debug!(peer = %sender, error = %err, "dropping undecodable packet");
                self.metrics.record_drop(DropReason::Decode);
                return false;
            }
        };

        self.metrics.record_dispatched();
        self.handlers.dispatch(&message)
    }

    // Handlers

    /// Note On handler: `(channel, note, velocity)`.
    pub fn on_note_on(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.handlers.on_note_on(handler);
        self
    }

    /// Note Off handler: `(channel, note, velocity)`.
    pub fn on_note_off(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.handlers.on_note_off(handler);
        self
    }

    /// Control Change handler: `(channel, control, value)`.
    pub fn on_control_change(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.handlers.on_control_change(handler);
        self
    }

    /// Program Change handler: `(channel, program)`.
    pub fn on_program_change(&mut self, handler: impl FnMut(u8, u8) + 'static) -> &mut Self {
        self.handlers.on_program_change(handler);
        self
    }

    /// Channel aftertouch handler: `(channel, pressure)`.
    pub fn on_channel_aftertouch(&mut self, handler: impl FnMut(u8, u8) + 'static) -> &mut Self {
        self.handlers.on_channel_aftertouch(handler);
        self
    }

    /// Polyphonic aftertouch handler: `(channel, note, pressure)`.
    pub fn on_poly_aftertouch(&mut self, handler: impl FnMut(u8, u8, u8) + 'static) -> &mut Self {
        self.handlers.on_poly_aftertouch(handler);
        self
    }

    /// Pitch bend handler: `(channel, signed value)`.
    pub fn on_pitch_bend(&mut self, handler: impl FnMut(u8, i16) + 'static) -> &mut Self {
        self.handlers.on_pitch_bend(handler);
        self
    }

    /// Song position handler.
    pub fn on_song_position(&mut self, handler: impl FnMut(u16) + 'static) -> &mut Self {
        self.handlers.on_song_position(handler);
        self
    }

    /// Song select handler.
    pub fn on_song_select(&mut self, handler: impl FnMut(u8) + 'static) -> &mut Self {
        self.handlers.on_song_select(handler);
        self
    }

    /// MTC quarter frame handler.
    pub fn on_time_code(&mut self, handler: impl FnMut(u8) + 'static) -> &mut Self {
        self.handlers.on_time_code(handler);
        self
    }

    /// Tune request handler.
    pub fn on_tune_request(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_tune_request(handler);
        self
    }

    /// Clock handler.
    pub fn on_clock(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_clock(handler);
        self
    }

    /// Start handler.
    pub fn on_start(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_start(handler);
        self
    }

    /// Continue handler.
    pub fn on_continue(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_continue(handler);
        self
    }

    /// Stop handler.
    pub fn on_stop(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_stop(handler);
        self
    }

    /// Active sensing handler.
    pub fn on_active_sensing(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_active_sensing(handler);
        self
    }

    /// System reset handler.
    pub fn on_system_reset(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.on_system_reset(handler);
        self
    }

    /// SysEx handler. Only called when `dispatch_sysex` is enabled.
    pub fn on_sysex(&mut self, handler: impl FnMut(&SysExMessage) + 'static) -> &mut Self {
        self.handlers.on_sysex(handler);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{MemoryAir, MemoryRadio};
    use std::cell::RefCell;
    use std::rc::Rc;

    const LOCAL: PeerAddress = PeerAddress::new([0x24, 0x6F, 0x28, 0, 0, 0]);

    fn peer(last: u8) -> PeerAddress {
        PeerAddress::new([0x24, 0x6F, 0x28, 0, 0, last])
    }

    fn started(air: &MemoryAir, config: TransportConfig) -> MidiTransport<MemoryRadio> {
        let mut transport = MidiTransport::new(air.radio(LOCAL), config);
        transport.begin().unwrap();
        transport
    }

    #[test]
    fn lifecycle() {
        let air = MemoryAir::new();
        let mut transport = MidiTransport::new(air.radio(LOCAL), TransportConfig::default());
        assert!(!transport.is_active());
        assert_eq!(transport.add_peer(peer(1)), Err(PeerError::NotActive));
        assert!(!transport.send_clock());

        transport.begin().unwrap();
        assert!(transport.radio().is_active());
        transport.add_peer(peer(1)).unwrap();
        transport.add_peer(peer(2)).unwrap();

        transport.deinit();
        assert!(!transport.is_active());
        assert!(!transport.radio().is_active());
        assert_eq!(transport.peer_count(), 0);
        assert_eq!(transport.radio().peer_count(), 0);
    }

    #[test]
    fn failed_activation_stays_inactive() {
        let air = MemoryAir::new();
        let mut radio = air.radio(LOCAL);
        radio.fail_activation(true);
        let mut transport = MidiTransport::new(radio, TransportConfig::default());

        assert!(matches!(transport.begin(), Err(TransportError::Radio(_))));
        assert!(!transport.is_active());
    }

    #[test]
    fn add_peer_bytes_checks_length() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());

        assert_eq!(
            transport.add_peer_bytes(&[1, 2, 3]),
            Err(PeerError::InvalidAddressLength { len: 3 })
        );
        transport.add_peer_bytes(&[0x24, 0x6F, 0x28, 0, 0, 7]).unwrap();
        assert!(transport.contains_peer(&peer(7)));
    }

    #[test]
    fn broadcast_without_peers_sends_nothing() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());

        assert!(!transport.send_note_on(1, 60, 100));
        assert!(air.sent().is_empty());
        assert_eq!(transport.metrics().empty_broadcasts, 1);
    }

    #[test]
    fn broadcast_survives_partial_failure() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        for i in 1..=3 {
            transport.add_peer(peer(i)).unwrap();
        }
        transport.radio_mut().fail_sends_to(peer(2));

        assert!(transport.send_control_change(1, 7, 127));
        assert_eq!(air.sends_to(&peer(1)), 1);
        assert_eq!(air.sends_to(&peer(2)), 0);
        assert_eq!(air.sends_to(&peer(3)), 1);

        let metrics = transport.metrics();
        assert_eq!(metrics.packets_sent, 2);
        assert_eq!(metrics.send_failures, 1);
    }

    #[test]
    fn broadcast_fails_when_every_send_fails() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        transport.add_peer(peer(1)).unwrap();
        transport.radio_mut().fail_sends_to(peer(1));

        assert!(!transport.send_start());
    }

    #[test]
    fn broadcast_order_follows_registry() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        for i in [3, 1, 2] {
            transport.add_peer(peer(i)).unwrap();
        }

        transport.send_clock();
        let order: Vec<_> = air.sent().iter().map(|packet| packet.to).collect();
        assert_eq!(order, vec![peer(3), peer(1), peer(2)]);
    }

    #[test]
    fn poll_dispatches_in_arrival_order() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        transport.on_note_on(move |c, n, v| log.borrow_mut().push((c, n, v)));

        air.inject(peer(1), LOCAL, vec![0x91, 60, 100]);
        air.inject(peer(1), LOCAL, vec![0x91, 62, 90]);

        assert_eq!(transport.poll(), 2);
        assert_eq!(*seen.borrow(), vec![(2, 60, 100), (2, 62, 90)]);
        assert_eq!(transport.poll(), 0);
    }

    #[test]
    fn poll_while_inactive_leaves_inbox() {
        let air = MemoryAir::new();
        let mut transport = MidiTransport::new(air.radio(LOCAL), TransportConfig::default());
        air.inject(peer(1), LOCAL, vec![0xF8]);

        assert_eq!(transport.poll(), 0);
        assert_eq!(air.pending(&LOCAL), 1);
    }

    #[test]
    fn handle_packet_ignored_while_inactive() {
        let air = MemoryAir::new();
        let mut transport = MidiTransport::new(air.radio(LOCAL), TransportConfig::default());
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        transport.on_clock(move || *flag.borrow_mut() = true);

        assert!(!transport.handle_packet(peer(1), &[0xF8]));
        assert!(!*ran.borrow());
        assert_eq!(transport.metrics().packets_received, 0);

        transport.begin().unwrap();
        assert!(transport.handle_packet(peer(1), &[0xF8]));
        assert!(*ran.borrow());
    }

    #[test]
    fn drops_are_counted() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        let called = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&called);
        transport.on_sysex(move |_| *flag.borrow_mut() = true);

        air.inject(peer(1), LOCAL, Vec::new());
        air.inject(peer(1), LOCAL, vec![0xF4]);
        let sysex = MidiMessage::SysEx(SysExMessage::new(vec![1, 2]).unwrap());
        air.inject(peer(1), LOCAL, sysex.encode());

        assert_eq!(transport.poll(), 3);
        assert!(!*called.borrow());
        let metrics = transport.metrics();
        assert_eq!(metrics.decode_errors, 2);
        assert_eq!(metrics.sysex_dropped, 1);
        assert_eq!(metrics.packets_dispatched, 0);
    }

    #[test]
    fn sysex_dispatch_when_enabled() {
        let air = MemoryAir::new();
        let config = TransportConfig {
            dispatch_sysex: true,
            ..TransportConfig::default()
        };
        let mut transport = started(&air, config);
        let payload = Rc::new(RefCell::new(Vec::new()));
        let slot = Rc::clone(&payload);
        transport.on_sysex(move |sysex| *slot.borrow_mut() = sysex.payload().to_vec());

        let message = MidiMessage::SysEx(SysExMessage::new(vec![0x7E, 0x01, 0x02]).unwrap());
        assert!(transport.handle_packet(peer(1), message.encode().as_bytes()));
        assert_eq!(*payload.borrow(), vec![0x7E, 0x01, 0x02]);
    }

    #[test]
    fn auto_discovery_registers_sender() {
        let air = MemoryAir::new();
        let config = TransportConfig {
            auto_discovery: true,
            max_peers: 1,
            ..TransportConfig::default()
        };
        let mut transport = started(&air, config);
        let clocks = Rc::new(RefCell::new(0));
        let count = Rc::clone(&clocks);
        transport.on_clock(move || *count.borrow_mut() += 1);

        air.inject(peer(1), LOCAL, vec![0xF8]);
        air.inject(peer(2), LOCAL, vec![0xF8]);
        transport.poll();

        assert!(transport.contains_peer(&peer(1)));
        assert!(!transport.contains_peer(&peer(2)));
        assert_eq!(*clocks.borrow(), 2);
        let metrics = transport.metrics();
        assert_eq!(metrics.peers_discovered, 1);
        assert_eq!(metrics.discovery_failures, 1);
    }

    #[test]
    fn discovery_disabled_by_default() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        transport.handle_packet(peer(1), &[0xFA]);
        assert_eq!(transport.peer_count(), 0);
    }

    #[test]
    fn send_sysex_rejects_oversized_payload() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        transport.add_peer(peer(1)).unwrap();

        assert!(transport.send_sysex(vec![0u8; 129]).is_err());
        assert!(transport.send_sysex(vec![0u8; 128]).unwrap());
        assert_eq!(air.sent()[0].data.len(), 129);
    }

    #[test]
    fn clear_peers_reports_refusals() {
        let air = MemoryAir::new();
        let mut transport = started(&air, TransportConfig::default());
        transport.add_peer(peer(1)).unwrap();
        transport.add_peer(peer(2)).unwrap();
        transport.radio_mut().refuse_del_peer(true);

        assert_eq!(transport.clear_peers(), Ok(2));
        assert_eq!(transport.peer_count(), 0);
    }
}
