use crate::utils;
use gameroom_client::{Bootstrap, BootstrapError, BootstrapState};
use gameroom_core::SignalBlob;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn full_exchange_reaches_connected_on_both_sides() {
    utils::init_tracing();
    let (a_end, a_rx, b_end, b_rx) = utils::pair();

    let mut initiator = Bootstrap::initiator(Arc::new(a_end));
    let mut responder = Bootstrap::responder(Arc::new(b_end));
    assert_eq!(initiator.state(), BootstrapState::Idle);
    assert_eq!(responder.state(), BootstrapState::Idle);

    let offer = initiator.offer().await.expect("offer");
    assert_eq!(initiator.state(), BootstrapState::LocalDescriptorReady);

    // Descriptors cross between peers as text, same codec either carrier.
    let offer = SignalBlob::decode(&offer.encode()).expect("offer round trip");
    let answer = responder.accept(offer).await.expect("answer");
    assert_eq!(responder.state(), BootstrapState::LocalDescriptorReady);

    let answer = SignalBlob::decode(&answer.encode()).expect("answer round trip");
    initiator.apply_answer(answer).await.expect("apply answer");
    assert_eq!(initiator.state(), BootstrapState::AwaitingRemoteDescriptor);

    let mut host_session = initiator.open_session(a_rx).await.expect("host session");
    assert_eq!(initiator.state(), BootstrapState::Connected);

    // The responder never awaits a further remote descriptor: channel-open
    // itself completes it.
    let mut guest_session = responder.open_session(b_rx).await.expect("guest session");
    assert_eq!(responder.state(), BootstrapState::Connected);

    host_session.send_text("tictactoe:5").await.expect("send move");
    assert_eq!(guest_session.recv().await.as_deref(), Some("tictactoe:5"));

    guest_session.send_text("rematch").await.expect("send rematch");
    assert_eq!(host_session.recv().await.as_deref(), Some("rematch"));
}

#[tokio::test]
async fn invalid_pasted_text_leaves_the_machine_untouched() {
    utils::init_tracing();
    let (a_end, a_rx, b_end, _b_rx) = utils::pair();

    let mut initiator = Bootstrap::initiator(Arc::new(a_end));
    let responder_end = Arc::new(b_end);

    let offer = initiator.offer().await.expect("offer");

    // The user pastes garbage where the answer should be. The codec rejects
    // it at the carrier boundary; the machine state is untouched and a
    // correct paste afterwards still completes.
    assert!(SignalBlob::decode("definitely not an answer").is_err());
    assert_eq!(initiator.state(), BootstrapState::LocalDescriptorReady);

    let mut responder = Bootstrap::responder(responder_end);
    let answer = responder.accept(offer).await.expect("answer");
    initiator.apply_answer(answer).await.expect("apply answer");
    let _session = initiator.open_session(a_rx).await.expect("session");
    assert_eq!(initiator.state(), BootstrapState::Connected);
}

#[tokio::test]
async fn semantically_unusable_descriptor_fails_the_machine() {
    utils::init_tracing();
    let (_a_end, _a_rx, b_end, _b_rx) = utils::pair();

    let mut responder = Bootstrap::responder(Arc::new(b_end));
    let bogus = SignalBlob::new(json!({"type": "pickle", "sdp": "nope"}));

    let err = responder.accept(bogus).await.expect_err("must be rejected");
    assert!(matches!(err, BootstrapError::Transport(_)), "got {err:?}");
    assert_eq!(responder.state(), BootstrapState::Failed);
}

#[tokio::test]
async fn operations_outside_their_state_are_rejected() {
    utils::init_tracing();
    let (a_end, _a_rx, b_end, _b_rx) = utils::pair();

    let mut initiator = Bootstrap::initiator(Arc::new(a_end));
    initiator.offer().await.expect("offer");
    let err = initiator.offer().await.expect_err("second offer");
    assert!(matches!(err, BootstrapError::InvalidState { .. }));

    // A responder has no offer operation at all.
    let mut responder = Bootstrap::responder(Arc::new(b_end));
    let err = responder.offer().await.expect_err("responder offer");
    assert!(matches!(err, BootstrapError::InvalidState { .. }));
    assert_eq!(responder.state(), BootstrapState::Idle);
}

#[tokio::test(start_paused = true)]
async fn withheld_channel_open_fails_both_sides_after_grace() {
    utils::init_tracing();
    let (a_end, a_rx, b_end, b_rx) = utils::silent_pair();
    let grace = Duration::from_secs(30);

    let mut initiator = Bootstrap::initiator(Arc::new(a_end)).with_grace_period(grace);
    let mut responder = Bootstrap::responder(Arc::new(b_end)).with_grace_period(grace);

    let offer = initiator.offer().await.expect("offer");
    let answer = responder.accept(offer).await.expect("answer");
    initiator.apply_answer(answer).await.expect("apply answer");

    let err = initiator
        .open_session(a_rx)
        .await
        .expect_err("initiator must time out");
    assert!(matches!(err, BootstrapError::NegotiationTimeout(d) if d == grace));
    assert_eq!(initiator.state(), BootstrapState::Failed);

    let err = responder
        .open_session(b_rx)
        .await
        .expect_err("responder must time out");
    assert!(matches!(err, BootstrapError::NegotiationTimeout(_)));
    assert_eq!(responder.state(), BootstrapState::Failed);
}
