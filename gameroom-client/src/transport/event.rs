use crate::transport::PeerChannel;
use gameroom_core::SignalBlob;
use std::sync::Arc;

/// Events an endpoint pushes toward its owner.
pub enum TransportEvent {
    /// The data channel opened; the handle is ready for traffic.
    ChannelOpen(Arc<dyn PeerChannel>),
    /// Inbound text frame on the open channel.
    Message(String),
    /// A local reachability candidate finished gathering (trickle path).
    CandidateGenerated(SignalBlob),
    /// The transport closed or failed; before channel-open this means the
    /// negotiation is dead, after it the session is over.
    Closed,
}

impl std::fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportEvent::ChannelOpen(_) => f.write_str("ChannelOpen"),
            TransportEvent::Message(text) => f.debug_tuple("Message").field(text).finish(),
            TransportEvent::CandidateGenerated(_) => f.write_str("CandidateGenerated"),
            TransportEvent::Closed => f.write_str("Closed"),
        }
    }
}
