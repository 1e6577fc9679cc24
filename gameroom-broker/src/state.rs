use gameroom_core::{ConnId, RoomId};
use std::collections::{HashMap, HashSet};

/// Outcome of removing a connection from the room table.
#[derive(Debug, PartialEq)]
pub enum Removal {
    /// The connection had no recorded room. Not an error.
    NotEnrolled,
    /// The connection was the last member; the room is gone.
    RoomDeleted(RoomId),
    /// Other members remain and should hear `peer_left`.
    PeersRemain {
        room: RoomId,
        remaining: Vec<ConnId>,
    },
}

/// The broker's room table: room-id -> member set, plus the reverse map
/// from connection to its single room. Owned by exactly one task; every
/// mutation goes through these methods so the no-empty-rooms invariant
/// holds at each return.
#[derive(Debug, Default)]
pub struct BrokerState {
    rooms: HashMap<RoomId, HashSet<ConnId>>,
    membership: HashMap<ConnId, RoomId>,
}

impl BrokerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently ensure `room` exists and add `conn` to it.
    ///
    /// A connection belongs to at most one room, so enrolling into a new
    /// room first removes it from the previous one; the returned `Removal`
    /// tells the caller who (if anyone) should hear `peer_left` there.
    pub fn enroll(&mut self, conn: ConnId, room: &RoomId) -> Removal {
        let prior = match self.membership.get(&conn).cloned() {
            Some(current) if current == *room => Removal::NotEnrolled,
            Some(_) => self.remove(conn),
            None => Removal::NotEnrolled,
        };

        self.rooms.entry(room.clone()).or_default().insert(conn);
        self.membership.insert(conn, room.clone());
        prior
    }

    /// Members of `room` other than `exclude`. Empty when the room does not
    /// exist — routing is best-effort, absence is not an error.
    pub fn members_except(&self, room: &RoomId, exclude: ConnId) -> Vec<ConnId> {
        match self.rooms.get(room) {
            Some(members) => members.iter().copied().filter(|m| *m != exclude).collect(),
            None => Vec::new(),
        }
    }

    /// Remove `conn` from its room, deleting the room if it became empty.
    pub fn remove(&mut self, conn: ConnId) -> Removal {
        let Some(room) = self.membership.remove(&conn) else {
            return Removal::NotEnrolled;
        };

        let Some(members) = self.rooms.get_mut(&room) else {
            return Removal::NotEnrolled;
        };
        members.remove(&conn);

        if members.is_empty() {
            self.rooms.remove(&room);
            Removal::RoomDeleted(room)
        } else {
            let remaining = members.iter().copied().collect();
            Removal::PeersRemain { room, remaining }
        }
    }

    /// Snapshot of current room identifiers, for `list` replies.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map_or(0, HashSet::len)
    }
}
