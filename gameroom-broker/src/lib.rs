mod broker;
mod serve;
mod state;
mod ws;

pub use broker::{Broker, BrokerEvent, BrokerHandle, REAP_INTERVAL};
pub use serve::{router, serve};
pub use state::{BrokerState, Removal};
pub use ws::ws_handler;
