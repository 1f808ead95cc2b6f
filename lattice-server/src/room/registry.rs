use lattice_core::{MemberId, RoomId};
use std::collections::HashMap;

#[derive(Debug)]
pub enum JoinOutcome {
    /// Accepted; carries the ordered list of members that were already in
    /// the room before this join.
    Joined(Vec<MemberId>),
    /// The connection is already a member of this exact room.
    AlreadyMember,
    /// The connection is a member of another room and must leave first.
    OtherRoom(RoomId),
}

#[derive(Debug)]
pub struct Departure {
    pub room: RoomId,
    pub remaining: Vec<MemberId>,
}

/// Room membership tables, owned by the relay task. Member order within a
/// room is join order.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Vec<MemberId>>,
    members: HashMap<MemberId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, member: MemberId, room: RoomId) -> JoinOutcome {
        match self.members.get(&member) {
            Some(current) if *current == room => return JoinOutcome::AlreadyMember,
            Some(current) => return JoinOutcome::OtherRoom(current.clone()),
            None => {}
        }

        let occupants = self.rooms.entry(room.clone()).or_default();
        let existing = occupants.clone();
        occupants.push(member.clone());
        self.members.insert(member, room);

        JoinOutcome::Joined(existing)
    }

    pub fn leave(&mut self, member: &MemberId) -> Option<Departure> {
        let room = self.members.remove(member)?;

        let occupants = self.rooms.get_mut(&room)?;
        occupants.retain(|m| m != member);
        let remaining = occupants.clone();

        if remaining.is_empty() {
            self.rooms.remove(&room);
        }

        Some(Departure { room, remaining })
    }

    pub fn members(&self, room: &RoomId) -> &[MemberId] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rooms(&self) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self.rooms.keys().cloned().collect();
        rooms.sort();
        rooms
    }
}
