//! Radio transport: peer addresses, the radio seam, the peer registry and
//! the send/poll facade.

mod address;
mod error;
mod handlers;
mod memory;
mod radio;
mod registry;
mod transport;

pub use address::{ADDRESS_LEN, PeerAddress};
pub use error::{PeerError, TransportError};
pub use handlers::HandlerTable;
pub use memory::{MemoryAir, MemoryRadio, SentPacket};
pub use radio::{Radio, RadioError};
pub use registry::{DEFAULT_MAX_PEERS, PeerRegistry};
pub use transport::{MidiTransport, TransportConfig};
