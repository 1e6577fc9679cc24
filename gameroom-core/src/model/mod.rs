mod blob;
mod frame;
mod room;
mod signal;

pub use blob::{DecodeError, SignalBlob};
pub use frame::{ChannelFrame, FrameError, GameKind};
pub use room::{ConnId, RoomId};
pub use signal::{ClientFrame, ServerFrame};
