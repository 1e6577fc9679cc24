use crate::utils;
use crate::utils::TestConn;
use gameroom_broker::Broker;
use gameroom_core::{ClientFrame, RoomId, ServerFrame};

#[tokio::test]
async fn create_acknowledges_and_close_removes_the_room() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let mut host = TestConn::connect(&broker).await;
    host.send(&broker, ClientFrame::Create { room: "abc123".into() })
        .await;
    assert_eq!(
        host.recv().await,
        ServerFrame::Created {
            room: "abc123".into()
        }
    );

    broker.disconnected(host.conn).await;

    let mut probe = TestConn::connect(&broker).await;
    assert!(probe.rooms(&broker).await.is_empty());
}

#[tokio::test]
async fn join_notifies_only_existing_members() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let mut first = TestConn::connect(&broker).await;
    first.join(&broker, "r").await;
    // Barrier: the joiner itself hears nothing about its own join.
    assert_eq!(first.rooms(&broker).await, vec![RoomId::from("r")]);

    let mut second = TestConn::connect(&broker).await;
    second.join(&broker, "r").await;
    assert_eq!(
        first.recv().await,
        ServerFrame::PeerJoined { room: "r".into() }
    );
    assert_eq!(second.rooms(&broker).await, vec![RoomId::from("r")]);

    let mut third = TestConn::connect(&broker).await;
    third.join(&broker, "r").await;
    // Exactly one notification per subsequent join, to each earlier member.
    assert_eq!(
        first.recv().await,
        ServerFrame::PeerJoined { room: "r".into() }
    );
    assert_eq!(
        second.recv().await,
        ServerFrame::PeerJoined { room: "r".into() }
    );
    assert_eq!(first.rooms(&broker).await, vec![RoomId::from("r")]);
    assert_eq!(second.rooms(&broker).await, vec![RoomId::from("r")]);
}

#[tokio::test]
async fn departure_notifies_remaining_members() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let mut staying = TestConn::connect(&broker).await;
    staying.join(&broker, "r").await;
    let leaving = TestConn::connect(&broker).await;
    leaving.join(&broker, "r").await;
    assert_eq!(
        staying.recv().await,
        ServerFrame::PeerJoined { room: "r".into() }
    );

    broker.disconnected(leaving.conn).await;
    assert_eq!(
        staying.recv().await,
        ServerFrame::PeerLeft { room: "r".into() }
    );
    // The room survives while anyone remains.
    assert_eq!(staying.rooms(&broker).await, vec![RoomId::from("r")]);

    broker.disconnected(staying.conn).await;
    let mut probe = TestConn::connect(&broker).await;
    assert!(probe.rooms(&broker).await.is_empty());
}

#[tokio::test]
async fn joining_a_second_room_leaves_the_first() {
    utils::init_tracing();
    let broker = Broker::spawn();

    let mut anchor = TestConn::connect(&broker).await;
    anchor.join(&broker, "old").await;
    let mut mover = TestConn::connect(&broker).await;
    mover.join(&broker, "old").await;
    assert_eq!(
        anchor.recv().await,
        ServerFrame::PeerJoined { room: "old".into() }
    );

    mover.join(&broker, "new").await;
    assert_eq!(
        anchor.recv().await,
        ServerFrame::PeerLeft { room: "old".into() }
    );

    let mut list = mover.rooms(&broker).await;
    list.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(list, vec![RoomId::from("new"), RoomId::from("old")]);
}
