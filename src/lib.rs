//! MIDI over a connectionless, peer-addressed radio link
//!
//! Messages are encoded into 1 to 3 byte packets (or a fixed 129-byte SysEx
//! container), fanned out to every registered peer, and dispatched to
//! per-kind callbacks when the host loop polls for inbound traffic.
//!
//! # Quick Start
//!
//! ```rust
//! use radio_midi::transport::MemoryAir;
//! use radio_midi::{MidiTransport, PeerAddress, TransportConfig};
//!
//! let keys_addr = PeerAddress::new([0x02, 0, 0, 0, 0, 0x01]);
//! let synth_addr = PeerAddress::new([0x02, 0, 0, 0, 0, 0x02]);
//!
//! // Two radios sharing one in-process medium
//! let air = MemoryAir::new();
//! let mut keys = MidiTransport::new(air.radio(keys_addr), TransportConfig::default());
//! let mut synth = MidiTransport::new(air.radio(synth_addr), TransportConfig::default());
//! keys.begin()?;
//! synth.begin()?;
//! keys.add_peer(synth_addr)?;
//!
//! synth.on_note_on(|channel, note, velocity| {
//!     println!("note on ch{channel} {note} vel {velocity}");
//! });
//!
//! assert!(keys.send_note_on(1, 60, 100));
//! assert_eq!(synth.poll(), 1);
//! # Ok::<(), radio_midi::TransportError>(())
//! ```
//!
//! # Features
//!
//! - **Bit-exact packet codec** - compatible with the native firmware layout
//! - **Best-effort broadcast** - succeeds if any peer accepted the packet
//! - **Poll-driven dispatch** - no threads, callbacks run on the polling thread
//! - **Pluggable radio** - implement [`Radio`] for real hardware, or use
//!   [`transport::MemoryAir`] for tests and loopback
//! - **`serde`** (optional) - serialize configs, addresses and messages

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    DecodeError, Error, MidiMessage, MidiStatus, MpeChannelAllocator, Packet, Result,
    SysExMessage,
};
pub use transport::{
    HandlerTable, MidiTransport, PeerAddress, PeerError, PeerRegistry, Radio, RadioError,
    TransportConfig, TransportError,
};

/// Crate version
pub const VERSION: &str = "0.5.1";
