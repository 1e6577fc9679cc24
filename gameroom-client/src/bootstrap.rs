use crate::session::PeerSession;
use crate::transport::{PeerChannel, PeerEndpoint, TransportError, TransportEvent};
use gameroom_core::{DecodeError, SignalBlob};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long a bootstrap waits for channel-open before giving up.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    LocalDescriptorPending,
    LocalDescriptorReady,
    AwaitingRemoteDescriptor,
    Connected,
    Failed,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Pasted or relayed text that is not a descriptor. The session state is
    /// untouched; the caller may prompt for input again.
    #[error("invalid input: {0}")]
    InvalidDescriptor(#[from] DecodeError),
    #[error("no channel opened within {0:?}")]
    NegotiationTimeout(Duration),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("operation not valid for {role:?} in state {state:?}")]
    InvalidState { role: Role, state: BootstrapState },
}

/// Drives one peer from `Idle` to an open data channel.
///
/// The machine only exists for the duration of setup: once the channel is
/// open it hands everything to a [`PeerSession`] and keeps nothing but the
/// terminal state. All waits are abandonable through [`Bootstrap::cancel`].
pub struct Bootstrap {
    role: Role,
    state: BootstrapState,
    endpoint: Option<Arc<dyn PeerEndpoint>>,
    local_descriptor: Option<SignalBlob>,
    grace: Duration,
}

impl Bootstrap {
    pub fn initiator(endpoint: Arc<dyn PeerEndpoint>) -> Self {
        Self::new(Role::Initiator, endpoint)
    }

    pub fn responder(endpoint: Arc<dyn PeerEndpoint>) -> Self {
        Self::new(Role::Responder, endpoint)
    }

    fn new(role: Role, endpoint: Arc<dyn PeerEndpoint>) -> Self {
        Self {
            role,
            state: BootstrapState::Idle,
            endpoint: Some(endpoint),
            local_descriptor: None,
            grace: DEFAULT_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub fn grace_period(&self) -> Duration {
        self.grace
    }

    /// The descriptor exposed for transmission, once one exists.
    pub fn local_descriptor(&self) -> Option<&SignalBlob> {
        self.local_descriptor.as_ref()
    }

    /// Initiator: generate the local offer descriptor. Suspends while the
    /// transport negotiates and gathers candidates.
    pub async fn offer(&mut self) -> Result<SignalBlob, BootstrapError> {
        self.expect(Role::Initiator, BootstrapState::Idle)?;
        let endpoint = self.endpoint()?;

        self.state = BootstrapState::LocalDescriptorPending;
        match endpoint.create_offer().await {
            Ok(blob) => {
                debug!("Local offer descriptor ready");
                self.local_descriptor = Some(blob.clone());
                self.state = BootstrapState::LocalDescriptorReady;
                Ok(blob)
            }
            Err(e) => {
                self.fail();
                Err(e.into())
            }
        }
    }

    /// Responder: consume the remote offer and generate the local answer.
    /// The responder never enters `AwaitingRemoteDescriptor` — channel-open
    /// is its completion signal.
    pub async fn accept(&mut self, offer: SignalBlob) -> Result<SignalBlob, BootstrapError> {
        self.expect(Role::Responder, BootstrapState::Idle)?;
        let endpoint = self.endpoint()?;

        self.state = BootstrapState::LocalDescriptorPending;
        match endpoint.accept_offer(offer).await {
            Ok(answer) => {
                debug!("Local answer descriptor ready");
                self.local_descriptor = Some(answer.clone());
                self.state = BootstrapState::LocalDescriptorReady;
                Ok(answer)
            }
            Err(e) => {
                self.fail();
                Err(e.into())
            }
        }
    }

    /// Initiator: apply the remote answer received over either carrier.
    pub async fn apply_answer(&mut self, answer: SignalBlob) -> Result<(), BootstrapError> {
        self.expect(Role::Initiator, BootstrapState::LocalDescriptorReady)?;
        let endpoint = self.endpoint()?;

        match endpoint.apply_answer(answer).await {
            Ok(()) => {
                self.state = BootstrapState::AwaitingRemoteDescriptor;
                Ok(())
            }
            Err(e) => {
                self.fail();
                Err(e.into())
            }
        }
    }

    /// Apply a relayed remote candidate. Quietly ignored once the endpoint
    /// is gone — trailing candidates after completion or cancellation are
    /// expected.
    pub async fn add_candidate(&mut self, cand: SignalBlob) -> Result<(), BootstrapError> {
        let Some(endpoint) = self.endpoint.clone() else {
            return Ok(());
        };
        if let Err(e) = endpoint.add_remote_candidate(cand).await {
            warn!("Ignoring unusable relayed candidate: {e}");
        }
        Ok(())
    }

    /// Wait for channel-open within the grace period and hand the session
    /// over. Valid once the local descriptor work is done: initiators after
    /// [`Bootstrap::apply_answer`], responders right after
    /// [`Bootstrap::accept`].
    pub async fn open_session(
        &mut self,
        mut events: mpsc::Receiver<TransportEvent>,
    ) -> Result<PeerSession, BootstrapError> {
        let ready = match (self.role, self.state) {
            (Role::Initiator, BootstrapState::AwaitingRemoteDescriptor) => true,
            (Role::Responder, BootstrapState::LocalDescriptorReady) => true,
            _ => false,
        };
        if !ready {
            return Err(self.invalid_state());
        }

        let deadline = tokio::time::Instant::now() + self.grace;
        loop {
            let event = tokio::time::timeout_at(deadline, events.recv()).await;
            match event {
                Ok(Some(TransportEvent::ChannelOpen(channel))) => {
                    return self.complete(channel, events);
                }
                // Candidates keep trickling while we wait; with a settled
                // descriptor they are already embedded, nothing to do.
                Ok(Some(TransportEvent::CandidateGenerated(_))) => {}
                Ok(Some(TransportEvent::Message(text))) => {
                    debug!("Dropping {} byte frame before channel-open", text.len());
                }
                Ok(Some(TransportEvent::Closed)) | Ok(None) => {
                    self.fail();
                    return Err(TransportError::ChannelClosed.into());
                }
                Err(_) => {
                    info!("No channel-open within {:?}", self.grace);
                    self.fail();
                    return Err(BootstrapError::NegotiationTimeout(self.grace));
                }
            }
        }
    }

    /// Mark the bootstrap connected and transfer ownership of the transport
    /// to the session. Used directly by drivers that observe channel-open
    /// while pumping events themselves.
    pub fn complete(
        &mut self,
        channel: Arc<dyn PeerChannel>,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Result<PeerSession, BootstrapError> {
        let endpoint = self.endpoint.take().ok_or_else(|| self.invalid_state())?;
        self.state = BootstrapState::Connected;
        self.local_descriptor = None;
        Ok(PeerSession::new(endpoint, channel, events))
    }

    /// Cancellation contract: always available, immediate from the caller's
    /// view, idempotent. Resets to `Idle`; the transport finishes closing on
    /// a background task, and nothing of it stays reachable from here.
    pub fn cancel(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            tokio::spawn(async move {
                endpoint.close().await;
            });
        }
        self.local_descriptor = None;
        self.state = BootstrapState::Idle;
    }

    pub(crate) fn fail(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            tokio::spawn(async move {
                endpoint.close().await;
            });
        }
        self.state = BootstrapState::Failed;
    }

    fn endpoint(&self) -> Result<Arc<dyn PeerEndpoint>, BootstrapError> {
        self.endpoint.clone().ok_or_else(|| self.invalid_state())
    }

    fn expect(&self, role: Role, state: BootstrapState) -> Result<(), BootstrapError> {
        if self.role == role && self.state == state {
            Ok(())
        } else {
            Err(self.invalid_state())
        }
    }

    fn invalid_state(&self) -> BootstrapError {
        BootstrapError::InvalidState {
            role: self.role,
            state: self.state,
        }
    }
}
