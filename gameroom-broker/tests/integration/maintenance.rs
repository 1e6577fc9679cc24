use crate::utils;
use crate::utils::TestConn;
use gameroom_broker::{Broker, REAP_INTERVAL};
use gameroom_core::{RoomId, ServerFrame};
use tokio::time::Duration;

// Paused-clock tests: `sleep` jumps the clock forward, firing the broker's
// reap interval without waiting wall-clock time.

#[tokio::test(start_paused = true)]
async fn reaper_cleans_up_silently_dead_connections() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let mut host = TestConn::connect(&broker).await;
    host.join(&broker, "abc").await;
    let guest = TestConn::connect(&broker).await;
    guest.join(&broker, "abc").await;
    assert_eq!(
        host.recv().await,
        ServerFrame::PeerJoined { room: "abc".into() }
    );

    // The guest's transport dies without ever emitting a close event.
    drop(guest);

    tokio::time::sleep(REAP_INTERVAL + Duration::from_secs(1)).await;

    assert_eq!(
        host.recv().await,
        ServerFrame::PeerLeft { room: "abc".into() }
    );
    assert_eq!(host.rooms(&broker).await, vec![RoomId::from("abc")]);
}

#[tokio::test(start_paused = true)]
async fn reaping_the_last_member_deletes_the_room() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let host = TestConn::connect(&broker).await;
    host.join(&broker, "abc").await;
    drop(host);

    tokio::time::sleep(REAP_INTERVAL + Duration::from_secs(1)).await;

    let mut probe = TestConn::connect(&broker).await;
    assert!(probe.rooms(&broker).await.is_empty());
}
