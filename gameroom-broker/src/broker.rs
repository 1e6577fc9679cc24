use crate::state::{BrokerState, Removal};
use gameroom_core::{ClientFrame, ConnId, RoomId, ServerFrame};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How often the broker sweeps for connections whose transport died without
/// a close event.
pub const REAP_INTERVAL: Duration = Duration::from_secs(30);

/// Everything the broker reacts to, funneled through one queue so room-table
/// mutations are serialized and per-room broadcast order equals arrival
/// order.
#[derive(Debug)]
pub enum BrokerEvent {
    Connected {
        conn: ConnId,
        tx: mpsc::UnboundedSender<ServerFrame>,
    },
    Frame {
        conn: ConnId,
        frame: ClientFrame,
    },
    Disconnected {
        conn: ConnId,
    },
}

/// Cloneable entry point into the broker task.
#[derive(Clone)]
pub struct BrokerHandle {
    tx: mpsc::Sender<BrokerEvent>,
}

impl BrokerHandle {
    pub async fn connected(&self, conn: ConnId, tx: mpsc::UnboundedSender<ServerFrame>) {
        let _ = self.tx.send(BrokerEvent::Connected { conn, tx }).await;
    }

    pub async fn frame(&self, conn: ConnId, frame: ClientFrame) {
        let _ = self.tx.send(BrokerEvent::Frame { conn, frame }).await;
    }

    pub async fn disconnected(&self, conn: ConnId) {
        let _ = self.tx.send(BrokerEvent::Disconnected { conn }).await;
    }
}

/// The session broker: groups connections into rooms and forwards signaling
/// payloads between room members without looking inside them. Holds no
/// durable state — a restart forgets every room.
pub struct Broker {
    state: BrokerState,
    peers: HashMap<ConnId, mpsc::UnboundedSender<ServerFrame>>,
    events: mpsc::Receiver<BrokerEvent>,
}

impl Broker {
    /// Spawn the broker event loop and return its handle.
    pub fn spawn() -> BrokerHandle {
        let (tx, rx) = mpsc::channel(256);
        let broker = Self {
            state: BrokerState::new(),
            peers: HashMap::new(),
            events: rx,
        };
        tokio::spawn(broker.run());
        BrokerHandle { tx }
    }

    pub async fn run(mut self) {
        info!("Broker event loop started");
        let mut reap = tokio::time::interval(REAP_INTERVAL);
        reap.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("All handles dropped. Shutting down broker.");
                            break;
                        }
                    }
                }
                _ = reap.tick() => self.reap(),
            }
        }

        info!("Broker event loop finished");
    }

    fn handle_event(&mut self, event: BrokerEvent) {
        match event {
            BrokerEvent::Connected { conn, tx } => {
                debug!("Connection registered: {conn}");
                self.peers.insert(conn, tx);
            }
            BrokerEvent::Frame { conn, frame } => self.handle_frame(conn, frame),
            BrokerEvent::Disconnected { conn } => self.disconnect(conn),
        }
    }

    fn handle_frame(&mut self, conn: ConnId, frame: ClientFrame) {
        match frame {
            ClientFrame::Create { room } => {
                self.enroll(conn, &room);
                info!("Room created: {room}");
                self.send_to(conn, ServerFrame::Created { room });
            }
            ClientFrame::Join { room } => {
                self.enroll(conn, &room);
                info!("Peer joined room: {room}");
                for member in self.state.members_except(&room, conn) {
                    self.send_to(member, ServerFrame::PeerJoined { room: room.clone() });
                }
            }
            ClientFrame::Offer { room, offer } => {
                self.relay(conn, &room, ServerFrame::Offer {
                    room: room.clone(),
                    offer,
                });
            }
            ClientFrame::Answer { room, answer } => {
                self.relay(conn, &room, ServerFrame::Answer {
                    room: room.clone(),
                    answer,
                });
            }
            ClientFrame::Ice { room, cand } => {
                self.relay(conn, &room, ServerFrame::Ice {
                    room: room.clone(),
                    cand,
                });
            }
            ClientFrame::List => {
                let list = self.state.room_ids();
                self.send_to(conn, ServerFrame::Rooms { list });
            }
        }
    }

    /// Add `conn` to `room`, notifying the previous room (if any) that the
    /// peer left it.
    fn enroll(&mut self, conn: ConnId, room: &RoomId) {
        match self.state.enroll(conn, room) {
            Removal::NotEnrolled => {}
            Removal::RoomDeleted(old) => {
                info!("Room {old} removed (empty)");
            }
            Removal::PeersRemain { room: old, remaining } => {
                for member in remaining {
                    self.send_to(member, ServerFrame::PeerLeft { room: old.clone() });
                }
            }
        }
    }

    /// Forward a payload, under its original tag, to every member of `room`
    /// other than the sender. Silently does nothing when the room does not
    /// exist: routing is best-effort and never surfaces an error.
    fn relay(&mut self, from: ConnId, room: &RoomId, frame: ServerFrame) {
        let targets = self.state.members_except(room, from);
        if targets.is_empty() {
            debug!("No peers to relay to in {room}");
            return;
        }
        for member in targets {
            self.send_to(member, frame.clone());
        }
    }

    fn send_to(&self, conn: ConnId, frame: ServerFrame) {
        let Some(tx) = self.peers.get(&conn) else {
            warn!("Attempted to send to unregistered connection {conn}");
            return;
        };
        if tx.send(frame).is_err() {
            debug!("Outbound channel for {conn} already closed");
        }
    }

    fn disconnect(&mut self, conn: ConnId) {
        self.peers.remove(&conn);
        match self.state.remove(conn) {
            Removal::NotEnrolled => {}
            Removal::RoomDeleted(room) => {
                info!("Room {room} removed (empty)");
            }
            Removal::PeersRemain { room, remaining } => {
                for member in remaining {
                    self.send_to(member, ServerFrame::PeerLeft { room: room.clone() });
                }
            }
        }
        debug!("Connection cleaned up: {conn}");
    }

    /// Dead-peer sweep: a transport that vanished without a close event
    /// leaves its outbound channel closed, which is the signal to run the
    /// normal disconnect cleanup for it.
    fn reap(&mut self) {
        let dead: Vec<ConnId> = self
            .peers
            .iter()
            .filter(|(_, tx)| tx.is_closed())
            .map(|(conn, _)| *conn)
            .collect();

        if dead.is_empty() {
            return;
        }
        info!("Reaping {} stale connection(s)", dead.len());
        for conn in dead {
            self.disconnect(conn);
        }
    }
}
