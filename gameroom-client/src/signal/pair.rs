use crate::bootstrap::{Bootstrap, BootstrapError, BootstrapState, Role};
use crate::session::PeerSession;
use crate::signal::{BrokerClient, SignalError};
use crate::transport::{RtcEndpoint, TransportConfig, TransportError, TransportEvent};
use gameroom_core::{ClientFrame, RoomId, ServerFrame};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PairError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error("signaling connection closed before pairing completed")]
    SignallerClosed,
    #[error("peer left the room before the channel opened")]
    PeerDeparted,
}

/// Host side of broker-mediated pairing: create the room, wait for a peer,
/// send the offer, then trickle candidates until the channel opens.
pub async fn host_room(
    client: &mut BrokerClient,
    room: &RoomId,
    transport: TransportConfig,
    grace: Duration,
) -> Result<PeerSession, PairError> {
    client
        .send(&ClientFrame::Create { room: room.clone() })
        .await?;
    wait_for(client, |frame| {
        matches!(frame, ServerFrame::Created { .. })
    })
    .await?;
    info!("Room {room} created; waiting for a peer");
    wait_for(client, |frame| {
        matches!(frame, ServerFrame::PeerJoined { .. })
    })
    .await?;

    let (endpoint, events) = RtcEndpoint::new(transport)
        .await
        .map_err(BootstrapError::from)?;
    let mut bootstrap = Bootstrap::initiator(Arc::new(endpoint)).with_grace_period(grace);

    let offer = bootstrap.offer().await?;
    client
        .send(&ClientFrame::Offer {
            room: room.clone(),
            offer,
        })
        .await?;

    drive(client, room, bootstrap, events).await
}

/// Guest side: join the room, answer the first offer that arrives, then
/// trickle candidates until the channel opens.
pub async fn join_room(
    client: &mut BrokerClient,
    room: &RoomId,
    transport: TransportConfig,
    grace: Duration,
) -> Result<PeerSession, PairError> {
    client
        .send(&ClientFrame::Join { room: room.clone() })
        .await?;
    info!("Joined room {room}; waiting for an offer");

    let offer = loop {
        match client.next().await? {
            Some(ServerFrame::Offer { offer, .. }) => break offer,
            Some(other) => debug!("Ignoring signaling frame while waiting for offer: {other:?}"),
            None => return Err(PairError::SignallerClosed),
        }
    };

    let (endpoint, events) = RtcEndpoint::new(transport)
        .await
        .map_err(BootstrapError::from)?;
    let mut bootstrap = Bootstrap::responder(Arc::new(endpoint)).with_grace_period(grace);

    let answer = bootstrap.accept(offer).await?;
    client
        .send(&ClientFrame::Answer {
            room: room.clone(),
            answer,
        })
        .await?;

    drive(client, room, bootstrap, events).await
}

async fn wait_for(
    client: &mut BrokerClient,
    accept: impl Fn(&ServerFrame) -> bool,
) -> Result<ServerFrame, PairError> {
    loop {
        match client.next().await? {
            Some(frame) if accept(&frame) => return Ok(frame),
            Some(other) => debug!("Ignoring signaling frame: {other:?}"),
            None => return Err(PairError::SignallerClosed),
        }
    }
}

enum Step {
    Transport(Option<TransportEvent>),
    Signal(Option<ServerFrame>),
    TimedOut,
}

/// Pump candidates both ways until channel-open or the grace period runs
/// out. Extra `peer_joined` notifications are ignored once a negotiation is
/// in flight — the bootstrap pairs exactly two endpoints.
async fn drive(
    client: &mut BrokerClient,
    room: &RoomId,
    mut bootstrap: Bootstrap,
    mut events: mpsc::Receiver<TransportEvent>,
) -> Result<PeerSession, PairError> {
    let deadline = tokio::time::Instant::now() + bootstrap.grace_period();

    loop {
        let step = tokio::select! {
            event = events.recv() => Step::Transport(event),
            frame = client.next() => Step::Signal(frame?),
            _ = tokio::time::sleep_until(deadline) => Step::TimedOut,
        };

        match step {
            Step::Transport(Some(TransportEvent::ChannelOpen(channel))) => {
                info!("Data channel open; pairing complete");
                return Ok(bootstrap.complete(channel, events)?);
            }
            Step::Transport(Some(TransportEvent::CandidateGenerated(cand))) => {
                client
                    .send(&ClientFrame::Ice {
                        room: room.clone(),
                        cand,
                    })
                    .await?;
            }
            Step::Transport(Some(TransportEvent::Message(text))) => {
                debug!("Dropping {} byte frame before channel-open", text.len());
            }
            Step::Transport(Some(TransportEvent::Closed)) | Step::Transport(None) => {
                bootstrap.fail();
                return Err(BootstrapError::from(TransportError::ChannelClosed).into());
            }
            Step::Signal(Some(ServerFrame::Answer { answer, .. })) => {
                if bootstrap.role() == Role::Initiator
                    && bootstrap.state() == BootstrapState::LocalDescriptorReady
                {
                    bootstrap.apply_answer(answer).await?;
                } else {
                    debug!("Ignoring answer frame in state {:?}", bootstrap.state());
                }
            }
            Step::Signal(Some(ServerFrame::Ice { cand, .. })) => {
                bootstrap.add_candidate(cand).await?;
            }
            Step::Signal(Some(ServerFrame::PeerLeft { .. })) => {
                warn!("Peer left during negotiation");
                bootstrap.fail();
                return Err(PairError::PeerDeparted);
            }
            Step::Signal(Some(other)) => {
                debug!("Ignoring signaling frame during negotiation: {other:?}");
            }
            Step::Signal(None) => {
                bootstrap.fail();
                return Err(PairError::SignallerClosed);
            }
            Step::TimedOut => {
                let grace = bootstrap.grace_period();
                bootstrap.fail();
                return Err(BootstrapError::NegotiationTimeout(grace).into());
            }
        }
    }
}
