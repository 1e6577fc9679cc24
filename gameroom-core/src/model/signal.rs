use crate::model::blob::SignalBlob;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Inbound signaling frames, one JSON object per text frame.
///
/// `{"t":"create","room":"abc123"}`, `{"t":"offer","room":...,"offer":...}`
/// and so on. `rooms` is accepted as an alias of `list` — the two were never
/// distinct operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientFrame {
    Create { room: RoomId },
    Join { room: RoomId },
    Offer { room: RoomId, offer: SignalBlob },
    Answer { room: RoomId, answer: SignalBlob },
    Ice { room: RoomId, cand: SignalBlob },
    #[serde(alias = "rooms")]
    List,
}

/// Outbound signaling frames. Offer/answer/ice payloads are forwarded
/// untouched under their original tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerFrame {
    Created { room: RoomId },
    PeerJoined { room: RoomId },
    PeerLeft { room: RoomId },
    Offer { room: RoomId, offer: SignalBlob },
    Answer { room: RoomId, answer: SignalBlob },
    Ice { room: RoomId, cand: SignalBlob },
    Rooms { list: Vec<RoomId> },
}
