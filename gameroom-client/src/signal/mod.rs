mod broker_client;
mod pair;

pub use broker_client::{BrokerClient, SignalError};
pub use pair::{PairError, host_room, join_room};
