//! Transport layer performance benchmarks
//!
//! Measures broadcast fan-out and poll/dispatch over the in-process medium.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use radio_midi::transport::{MemoryAir, MemoryRadio};
use radio_midi::{MidiTransport, PeerAddress, TransportConfig};

const LOCAL: PeerAddress = PeerAddress::new([0x02, 0, 0, 0, 0, 0]);

fn peer(index: u8) -> PeerAddress {
    PeerAddress::new([0x02, 0, 0, 0, 1, index])
}

fn transport_with_peers(air: &MemoryAir, peers: u8) -> MidiTransport<MemoryRadio> {
    let mut transport = MidiTransport::new(air.radio(LOCAL), TransportConfig::default());
    transport.begin().unwrap();
    for index in 0..peers {
        transport.add_peer(peer(index)).unwrap();
    }
    transport
}

/// Benchmark fan-out to a growing peer set
fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for peers in [1u8, 5, 20] {
        let air = MemoryAir::new();
        let mut transport = transport_with_peers(&air, peers);
        group.throughput(Throughput::Elements(u64::from(peers)));
        group.bench_with_input(BenchmarkId::new("note_on", peers), &peers, |b, _| {
            b.iter(|| {
                black_box(transport.send_note_on(1, black_box(60), 100));
                air.clear_log();
            });
        });
    }

    group.finish();
}

/// Benchmark draining and dispatching inbound packets
fn bench_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll");
    const BATCH: usize = 64;

    let air = MemoryAir::new();
    let mut transport = transport_with_peers(&air, 0);
    let mut notes = 0u64;
    transport.on_note_on(move |_, note, _| {
        notes += u64::from(note);
        black_box(notes);
    });

    group.throughput(Throughput::Elements(BATCH as u64));
    group.bench_function("dispatch_note_on", |b| {
        b.iter(|| {
            for _ in 0..BATCH {
                air.inject(peer(1), LOCAL, vec![0x90, 60, 100]);
            }
            black_box(transport.poll());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_broadcast, bench_poll);
criterion_main!(benches);
