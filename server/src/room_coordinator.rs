use crate::room::Room;
use serde::Serialize;
use std::collections::HashMap;
use system::{ConnectionId, Operation, Participant, PathData, RoomId};

/// Owns the state of every live room. Rooms are created on first join and
/// dropped, history included, as soon as the last member leaves.
///
/// All methods take `&mut self`; the gateway task is the only owner, which
/// is what serializes mutations.
#[derive(Default)]
pub struct RoomCoordinator {
    rooms: HashMap<RoomId, Room>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRoom {
    pub operations: Vec<Operation>,
    pub users: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDescription {
    pub room_id: RoomId,
    pub members: Vec<ConnectionId>,
    pub operations: usize,
    pub cursor: isize,
}

impl RoomCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn join(&mut self, room_id: &str, participant_id: ConnectionId) -> JoinedRoom {
        let room = self.rooms.entry(room_id.to_owned()).or_insert_with(|| {
            log::info!("Room {} created", room_id);
            Room::new()
        });
        room.members.add(participant_id);
        log::info!("Connection {} joined room {}", participant_id, room_id);
        JoinedRoom {
            operations: room.log.snapshot().operations,
            users: room.members.participants(),
        }
    }

    /// Returns whether `participant_id` was a member. Safe to call twice or
    /// for a join that never happened.
    pub fn leave(&mut self, room_id: &str, participant_id: ConnectionId) -> bool {
        let (was_member, now_empty) = match self.rooms.get_mut(room_id) {
            Some(room) => {
                let was_member = room.members.contains(&participant_id);
                room.members.remove(&participant_id);
                (was_member, room.members.is_empty())
            }
            None => return false,
        };
        if was_member {
            log::info!("Connection {} left room {}", participant_id, room_id);
        }
        if now_empty {
            self.rooms.remove(room_id);
            log::info!("Room {} destroyed", room_id);
        }
        was_member
    }

    pub fn record_draw(
        &mut self,
        room_id: &str,
        author_id: ConnectionId,
        payload: PathData,
    ) -> Option<Operation> {
        self.rooms
            .get_mut(room_id)
            .map(|room| room.record_draw(author_id, payload))
    }

    pub fn request_undo(&mut self, room_id: &str) -> bool {
        self.rooms
            .get_mut(room_id)
            .map_or(false, |room| room.log.undo())
    }

    pub fn request_redo(&mut self, room_id: &str) -> bool {
        self.rooms
            .get_mut(room_id)
            .map_or(false, |room| room.log.redo())
    }

    pub fn request_clear(&mut self, room_id: &str) {
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.log.clear();
        }
    }

    pub fn participant(&self, room_id: &str, participant_id: &ConnectionId) -> Option<Participant> {
        self.rooms
            .get(room_id)
            .and_then(|room| room.members.participant(participant_id))
    }

    pub fn members(&self, room_id: &str) -> &[ConnectionId] {
        self.rooms
            .get(room_id)
            .map(|room| room.members.list())
            .unwrap_or(&[])
    }

    pub fn describe(&self) -> Vec<RoomDescription> {
        let mut descriptions = self
            .rooms
            .iter()
            .map(|(room_id, room)| RoomDescription {
                room_id: room_id.clone(),
                members: room.members.list().to_vec(),
                operations: room.log.len(),
                cursor: room.log.cursor(),
            })
            .collect::<Vec<_>>();
        descriptions.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        descriptions
    }
}
