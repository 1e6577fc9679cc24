pub mod bootstrap;
pub mod offline;
pub mod session;
pub mod signal;
pub mod transport;

pub use bootstrap::{Bootstrap, BootstrapError, BootstrapState, DEFAULT_GRACE_PERIOD, Role};
pub use offline::{CachedResponse, MemoryCache, OfflineCache};
pub use session::PeerSession;
pub use signal::{BrokerClient, PairError, SignalError, host_room, join_room};
pub use transport::{
    PeerChannel, PeerEndpoint, RtcEndpoint, TransportConfig, TransportError, TransportEvent,
};
