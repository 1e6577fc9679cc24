use crate::transport::{
    GAME_CHANNEL_LABEL, PeerChannel, PeerEndpoint, TransportConfig, TransportError, TransportEvent,
};
use async_trait::async_trait;
use gameroom_core::SignalBlob;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// The native WebRTC binding of [`PeerEndpoint`].
pub struct RtcEndpoint {
    pc: Arc<RTCPeerConnection>,
    events: mpsc::Sender<TransportEvent>,
    settle_timeout: Duration,
}

impl RtcEndpoint {
    /// Build a peer connection and wire its callbacks into an event stream.
    pub async fn new(
        config: TransportConfig,
    ) -> Result<(Self, mpsc::Receiver<TransportEvent>), TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }],
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);
        let (event_tx, event_rx) = mpsc::channel(64);

        let state_tx = event_tx.clone();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let tx = state_tx.clone();
            Box::pin(async move {
                info!("Peer connection state changed: {s:?}");
                match s {
                    RTCPeerConnectionState::Failed
                    | RTCPeerConnectionState::Disconnected
                    | RTCPeerConnectionState::Closed => {
                        let _ = tx.send(TransportEvent::Closed).await;
                    }
                    _ => {}
                }
            })
        }));

        let ice_tx = event_tx.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(value) = serde_json::to_value(&init) else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(SignalBlob::new(value)))
                    .await;
            })
        }));

        // Responder side: adopt whatever channel the initiator created.
        let dc_tx = event_tx.clone();
        pc.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            Box::pin(async move {
                debug!("Adopting data channel {:?}", dc.label());
                Self::wire_channel(dc, tx);
            })
        }));

        Ok((
            Self {
                pc,
                events: event_tx,
                settle_timeout: config.settle_timeout,
            },
            event_rx,
        ))
    }

    fn wire_channel(dc: Arc<RTCDataChannel>, events: mpsc::Sender<TransportEvent>) {
        let open_dc = dc.clone();
        let open_tx = events.clone();
        dc.on_open(Box::new(move || {
            let tx = open_tx.clone();
            let channel: Arc<dyn PeerChannel> = Arc::new(RtcChannel {
                dc: open_dc.clone(),
            });
            Box::pin(async move {
                info!("Data channel open");
                let _ = tx.send(TransportEvent::ChannelOpen(channel)).await;
            })
        }));

        let msg_tx = events.clone();
        dc.on_message(Box::new(move |msg: DataChannelMessage| {
            let tx = msg_tx.clone();
            Box::pin(async move {
                let text = String::from_utf8_lossy(&msg.data).into_owned();
                let _ = tx.send(TransportEvent::Message(text)).await;
            })
        }));

        let close_tx = events;
        dc.on_close(Box::new(move || {
            let tx = close_tx.clone();
            Box::pin(async move {
                let _ = tx.send(TransportEvent::Closed).await;
            })
        }));
    }

    /// Finalize the pending local descriptor.
    ///
    /// Gathering reachability candidates takes variable wall-clock time, so
    /// wait for the transport's gathering-complete signal but cap the wait:
    /// past the cap the descriptor ships with whatever candidates exist.
    async fn settled_local_description(&self) -> Result<SignalBlob, TransportError> {
        let mut gathering_done = self.pc.gathering_complete_promise().await;
        if tokio::time::timeout(self.settle_timeout, gathering_done.recv())
            .await
            .is_err()
        {
            debug!(
                "Candidate gathering exceeded {:?}; using partial descriptor",
                self.settle_timeout
            );
        }

        let desc = self
            .pc
            .local_description()
            .await
            .ok_or_else(|| TransportError::Negotiation("no local description set".to_string()))?;
        let value = serde_json::to_value(&desc)
            .map_err(|e| TransportError::Endpoint(e.to_string()))?;
        Ok(SignalBlob::new(value))
    }

    fn descriptor(blob: SignalBlob) -> Result<RTCSessionDescription, TransportError> {
        serde_json::from_value(blob.into_value())
            .map_err(|e| TransportError::Negotiation(format!("unusable descriptor: {e}")))
    }
}

#[async_trait]
impl PeerEndpoint for RtcEndpoint {
    async fn create_offer(&self) -> Result<SignalBlob, TransportError> {
        let dc = self.pc.create_data_channel(GAME_CHANNEL_LABEL, None).await?;
        Self::wire_channel(dc, self.events.clone());

        let offer = self.pc.create_offer(None).await?;
        self.pc.set_local_description(offer).await?;
        self.settled_local_description().await
    }

    async fn accept_offer(&self, offer: SignalBlob) -> Result<SignalBlob, TransportError> {
        self.pc
            .set_remote_description(Self::descriptor(offer)?)
            .await?;

        let answer = self.pc.create_answer(None).await?;
        self.pc.set_local_description(answer).await?;
        self.settled_local_description().await
    }

    async fn apply_answer(&self, answer: SignalBlob) -> Result<(), TransportError> {
        self.pc
            .set_remote_description(Self::descriptor(answer)?)
            .await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, cand: SignalBlob) -> Result<(), TransportError> {
        let init: RTCIceCandidateInit = serde_json::from_value(cand.into_value())
            .map_err(|e| TransportError::Negotiation(format!("unusable candidate: {e}")))?;
        self.pc.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            warn!("Error closing peer connection: {e}");
        }
    }
}

struct RtcChannel {
    dc: Arc<RTCDataChannel>,
}

#[async_trait]
impl PeerChannel for RtcChannel {
    async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.dc.send_text(text).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.dc.close().await {
            warn!("Error closing data channel: {e}");
        }
    }
}
