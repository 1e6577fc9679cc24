use crate::transport::{PeerChannel, PeerEndpoint, TransportError, TransportEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A live peer-to-peer session: what the bootstrap hands to the game layer
/// once the channel is open. Keeps the endpoint alive for as long as the
/// session exists; the bootstrap itself is done at this point.
pub struct PeerSession {
    endpoint: Arc<dyn PeerEndpoint>,
    channel: Arc<dyn PeerChannel>,
    events: mpsc::Receiver<TransportEvent>,
}

impl std::fmt::Debug for PeerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerSession").finish_non_exhaustive()
    }
}

impl PeerSession {
    pub fn new(
        endpoint: Arc<dyn PeerEndpoint>,
        channel: Arc<dyn PeerChannel>,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        Self {
            endpoint,
            channel,
            events,
        }
    }

    pub async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.channel.send_text(text).await
    }

    /// Next inbound text frame; `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<String> {
        loop {
            match self.events.recv().await? {
                TransportEvent::Message(text) => return Some(text),
                TransportEvent::Closed => return None,
                other => debug!("Ignoring transport event in session: {other:?}"),
            }
        }
    }

    pub async fn close(self) {
        self.channel.close().await;
        self.endpoint.close().await;
    }
}
