pub mod model;

pub use model::{
    ChannelFrame, ClientFrame, ConnId, DecodeError, FrameError, GameKind, RoomId, ServerFrame,
    SignalBlob,
};
