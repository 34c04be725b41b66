use std::sync::atomic::{AtomicU64, Ordering};

/// Per-transport counters for the send and receive paths.
///
/// Drops on the receive path are silent to the caller; these counters are
/// where they become visible.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    broadcasts: AtomicU64,
    empty_broadcasts: AtomicU64,
    packets_sent: AtomicU64,
    send_failures: AtomicU64,
    packets_received: AtomicU64,
    packets_dispatched: AtomicU64,
    decode_errors: AtomicU64,
    sysex_dropped: AtomicU64,
    peers_discovered: AtomicU64,
    discovery_failures: AtomicU64,
}

/// Outcome of a single broadcast, for counting.
#[derive(Clone, Copy)]
pub(crate) enum BroadcastOutcome {
    /// No peers were registered
    NoPeers,
    /// Sends were attempted
    Attempted { sent: u64, failed: u64 },
}

/// Reason an inbound packet never reached a handler.
#[derive(Clone, Copy)]
pub(crate) enum DropReason {
    Decode,
    SysEx,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_broadcast(&self, outcome: BroadcastOutcome) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        match outcome {
            BroadcastOutcome::NoPeers => {
                self.empty_broadcasts.fetch_add(1, Ordering::Relaxed);
            }
            BroadcastOutcome::Attempted { sent, failed } => {
                self.packets_sent.fetch_add(sent, Ordering::Relaxed);
                self.send_failures.fetch_add(failed, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub(crate) fn record_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dispatched(&self) {
        self.packets_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_drop(&self, reason: DropReason) {
        match reason {
            DropReason::Decode => self.decode_errors.fetch_add(1, Ordering::Relaxed),
            DropReason::SysEx => self.sysex_dropped.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub(crate) fn record_discovery(&self, added: bool) {
        if added {
            self.peers_discovered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.discovery_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            empty_broadcasts: self.empty_broadcasts.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            packets_received: self.packets_received.load(Ordering::Relaxed),
            packets_dispatched: self.packets_dispatched.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            sysex_dropped: self.sysex_dropped.load(Ordering::Relaxed),
            peers_discovered: self.peers_discovered.load(Ordering::Relaxed),
            discovery_failures: self.discovery_failures.load(Ordering::Relaxed),
        }
    }
}

/// Lightweight snapshot of transport counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    /// Calls to `broadcast`, including those with no peers
    pub broadcasts: u64,
    /// Broadcasts skipped because no peer was registered
    pub empty_broadcasts: u64,
    /// Per-peer sends the radio accepted
    pub packets_sent: u64,
    /// Per-peer sends the radio refused
    pub send_failures: u64,
    /// Inbound packets drained from the radio
    pub packets_received: u64,
    /// Inbound packets that reached the handler table
    pub packets_dispatched: u64,
    /// Inbound packets that failed to decode
    pub decode_errors: u64,
    /// Inbound SysEx containers dropped
    pub sysex_dropped: u64,
    /// Senders registered by auto-discovery
    pub peers_discovered: u64,
    /// Auto-discovery attempts the registry refused
    pub discovery_failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of attempted per-peer sends that the radio accepted.
    #[must_use]
    pub fn send_success_ratio(&self) -> Option<f64> {
        let attempted = self.packets_sent + self.send_failures;
        if attempted == 0 {
            return None;
        }
        Some(self.packets_sent as f64 / attempted as f64)
    }

    /// Inbound packets that never reached a handler.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.decode_errors + self.sysex_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_counts() {
        let metrics = Metrics::default();
        metrics.record_broadcast(BroadcastOutcome::NoPeers);
        metrics.record_broadcast(BroadcastOutcome::Attempted { sent: 2, failed: 1 });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.broadcasts, 2);
        assert_eq!(snapshot.empty_broadcasts, 1);
        assert_eq!(snapshot.packets_sent, 2);
        assert_eq!(snapshot.send_failures, 1);
        let ratio = snapshot.send_success_ratio().unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drop_counts() {
        let metrics = Metrics::default();
        metrics.record_received();
        metrics.record_drop(DropReason::Decode);
        metrics.record_received();
        metrics.record_drop(DropReason::SysEx);
        metrics.record_received();
        metrics.record_dispatched();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_received, 3);
        assert_eq!(snapshot.packets_dispatched, 1);
        assert_eq!(snapshot.dropped(), 2);
    }

    #[test]
    fn empty_ratio_is_none() {
        assert_eq!(MetricsSnapshot::default().send_success_ratio(), None);
    }
}
