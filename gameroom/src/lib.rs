pub use gameroom_core::{RoomId, SignalBlob};

pub mod model {
    pub use gameroom_core::*;
}

#[cfg(feature = "broker")]
pub mod broker {
    pub use gameroom_broker::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use gameroom_client::*;
}

#[cfg(feature = "games")]
pub mod games {
    pub use gameroom_games::*;
}
