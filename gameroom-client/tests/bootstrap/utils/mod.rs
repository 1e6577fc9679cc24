use async_trait::async_trait;
use gameroom_client::transport::{PeerChannel, PeerEndpoint, TransportError, TransportEvent};
use gameroom_core::SignalBlob;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// A loopback transport: two endpoints whose channels feed each other's
/// event streams. Descriptors are tiny mock blobs with real `type` fields so
/// semantic rejection can be exercised.
pub struct MockEndpoint {
    /// This side's event stream.
    events: mpsc::Sender<TransportEvent>,
    /// The other side's event stream, for delivering channel traffic.
    peer_events: mpsc::Sender<TransportEvent>,
    /// When false, negotiation succeeds but no channel ever opens.
    opens_channel: bool,
    closed: Arc<AtomicBool>,
}

impl MockEndpoint {
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

/// A connected initiator/responder pair.
pub fn pair() -> (
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
) {
    build_pair(true)
}

/// A pair whose negotiation succeeds but whose channel never opens.
pub fn silent_pair() -> (
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
) {
    build_pair(false)
}

fn build_pair(
    opens_channel: bool,
) -> (
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
    MockEndpoint,
    mpsc::Receiver<TransportEvent>,
) {
    let (a_tx, a_rx) = mpsc::channel(16);
    let (b_tx, b_rx) = mpsc::channel(16);

    let a = MockEndpoint {
        events: a_tx.clone(),
        peer_events: b_tx.clone(),
        opens_channel,
        closed: Arc::new(AtomicBool::new(false)),
    };
    let b = MockEndpoint {
        events: b_tx,
        peer_events: a_tx,
        opens_channel,
        closed: Arc::new(AtomicBool::new(false)),
    };
    (a, a_rx, b, b_rx)
}

fn expect_type(blob: &SignalBlob, wanted: &str) -> Result<(), TransportError> {
    if blob.as_value()["type"] == wanted {
        Ok(())
    } else {
        Err(TransportError::Negotiation(format!(
            "expected a {wanted} descriptor, got {}",
            blob.as_value()["type"]
        )))
    }
}

#[async_trait]
impl PeerEndpoint for MockEndpoint {
    async fn create_offer(&self) -> Result<SignalBlob, TransportError> {
        Ok(SignalBlob::new(
            json!({"type": "offer", "sdp": "mock offer sdp"}),
        ))
    }

    async fn accept_offer(&self, offer: SignalBlob) -> Result<SignalBlob, TransportError> {
        expect_type(&offer, "offer")?;
        Ok(SignalBlob::new(
            json!({"type": "answer", "sdp": "mock answer sdp"}),
        ))
    }

    async fn apply_answer(&self, answer: SignalBlob) -> Result<(), TransportError> {
        expect_type(&answer, "answer")?;
        if !self.opens_channel {
            return Ok(());
        }

        // Both sides observe channel-open, each holding a handle that
        // delivers into the other's event stream.
        let ours: Arc<dyn PeerChannel> = Arc::new(MockChannel {
            out: self.peer_events.clone(),
            closed: self.closed.clone(),
        });
        let theirs: Arc<dyn PeerChannel> = Arc::new(MockChannel {
            out: self.events.clone(),
            closed: self.closed.clone(),
        });
        let _ = self.events.send(TransportEvent::ChannelOpen(ours)).await;
        let _ = self
            .peer_events
            .send(TransportEvent::ChannelOpen(theirs))
            .await;
        Ok(())
    }

    async fn add_remote_candidate(&self, _cand: SignalBlob) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub struct MockChannel {
    out: mpsc::Sender<TransportEvent>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl PeerChannel for MockChannel {
    async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::ChannelClosed);
        }
        self.out
            .send(TransportEvent::Message(text.to_string()))
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.out.send(TransportEvent::Closed).await;
    }
}
