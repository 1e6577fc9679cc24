mod config;
mod event;
mod rtc;

pub use config::{DEFAULT_STUN_SERVER, GAME_CHANNEL_LABEL, TransportConfig};
pub use event::TransportEvent;
pub use rtc::RtcEndpoint;

use async_trait::async_trait;
use gameroom_core::SignalBlob;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer's blob was structurally fine but the transport rejected it.
    #[error("negotiation failed: {0}")]
    Negotiation(String),
    #[error("transport endpoint error: {0}")]
    Endpoint(String),
    #[error("data channel is not open")]
    ChannelClosed,
}

impl From<webrtc::Error> for TransportError {
    fn from(e: webrtc::Error) -> Self {
        TransportError::Endpoint(e.to_string())
    }
}

/// One side of an open data channel.
#[async_trait]
pub trait PeerChannel: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), TransportError>;
    async fn close(&self);
}

/// A peer transport endpoint, decoupled from any concrete binding.
///
/// Descriptor and candidate payloads cross this boundary as opaque blobs;
/// converting them into transport-native types happens behind the trait and
/// is where semantic validation is allowed to fail. Asynchronous happenings
/// (channel adoption and opening, inbound messages, locally gathered
/// candidates, teardown) are delivered on the event stream handed out at
/// construction, never through ambient callbacks.
#[async_trait]
pub trait PeerEndpoint: Send + Sync {
    /// Initiator: create the game data channel and a finalized local offer.
    async fn create_offer(&self) -> Result<SignalBlob, TransportError>;

    /// Responder: apply the remote offer, adopt whatever channel the
    /// initiator created, and produce a finalized local answer.
    async fn accept_offer(&self, offer: SignalBlob) -> Result<SignalBlob, TransportError>;

    /// Initiator: apply the remote answer.
    async fn apply_answer(&self, answer: SignalBlob) -> Result<(), TransportError>;

    /// Trickle path: apply a relayed remote candidate.
    async fn add_remote_candidate(&self, cand: SignalBlob) -> Result<(), TransportError>;

    /// Release every transport resource this endpoint holds.
    async fn close(&self);
}
