use crate::utils;
use gameroom_client::{Bootstrap, BootstrapError, BootstrapState};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

async fn wait_until_closed(flag: &std::sync::atomic::AtomicBool) {
    for _ in 0..100 {
        if flag.load(Ordering::SeqCst) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("endpoint was never closed");
}

#[tokio::test]
async fn cancel_releases_the_endpoint_and_returns_to_idle() {
    utils::init_tracing();
    let (a_end, _a_rx, _b_end, _b_rx) = utils::pair();
    let closed = a_end.closed_flag();

    let mut bootstrap = Bootstrap::initiator(Arc::new(a_end));
    bootstrap.offer().await.expect("offer");
    assert_eq!(bootstrap.state(), BootstrapState::LocalDescriptorReady);

    bootstrap.cancel();
    assert_eq!(bootstrap.state(), BootstrapState::Idle);
    assert!(bootstrap.local_descriptor().is_none());
    wait_until_closed(&closed).await;

    // Idempotent.
    bootstrap.cancel();
    assert_eq!(bootstrap.state(), BootstrapState::Idle);
}

#[tokio::test]
async fn cancel_is_available_from_every_state() {
    utils::init_tracing();

    // Idle.
    let (a_end, _a_rx, offer_end, _b_rx) = utils::pair();
    let mut fresh = Bootstrap::initiator(Arc::new(a_end));
    fresh.cancel();
    assert_eq!(fresh.state(), BootstrapState::Idle);

    // Mid-negotiation on the responder side.
    let (c_end, _c_rx, _d_end, _d_rx) = utils::pair();
    let closed = c_end.closed_flag();
    let mut responder = Bootstrap::responder(Arc::new(c_end));
    let mut initiator = Bootstrap::initiator(Arc::new(offer_end));
    let offer = initiator.offer().await.expect("offer");
    responder.accept(offer).await.expect("accept");
    responder.cancel();
    assert_eq!(responder.state(), BootstrapState::Idle);
    wait_until_closed(&closed).await;
}

#[tokio::test]
async fn a_cancelled_machine_rejects_further_operations() {
    utils::init_tracing();
    let (a_end, _a_rx, _b_end, _b_rx) = utils::pair();

    let mut bootstrap = Bootstrap::initiator(Arc::new(a_end));
    bootstrap.offer().await.expect("offer");
    bootstrap.cancel();

    // A new connection attempt starts with a fresh machine; the cancelled
    // one only tears down.
    let err = bootstrap.offer().await.expect_err("offer after cancel");
    assert!(matches!(err, BootstrapError::InvalidState { .. }));
}
