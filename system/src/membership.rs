use crate::message::{ConnectionId, Participant};

pub const PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

/// Connected participants of a room in join order.
///
/// Display attributes are derived from the position in this order, so when a
/// member leaves, everyone who joined after them moves down by one and gets a
/// new color and label. Clients should expect that.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    members: Vec<ConnectionId>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, connection_id: ConnectionId) {
        if !self.contains(&connection_id) {
            self.members.push(connection_id);
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) {
        self.members.retain(|e| e != connection_id);
    }

    pub fn list(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn index_of(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.members.iter().position(|e| e == connection_id)
    }

    pub fn participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        self.index_of(connection_id)
            .map(|index| derive_participant(*connection_id, index))
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.members
            .iter()
            .enumerate()
            .map(|(index, connection_id)| derive_participant(*connection_id, index))
            .collect()
    }
}

pub fn derive_participant(user_id: ConnectionId, index: usize) -> Participant {
    Participant {
        user_id,
        color: PALETTE[index % PALETTE.len()].to_string(),
        name: format!("User {}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_adds_idempotently() {
        let mut registry = MembershipRegistry::new();
        registry.add(10);
        registry.add(10);
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.list(), &[10]);
    }

    #[test]
    fn it_ignores_removing_absent_member() {
        let mut registry = MembershipRegistry::new();
        registry.add(1);
        registry.remove(&2);
        assert_eq!(registry.list(), &[1]);
        registry.remove(&1);
        registry.remove(&1);
        assert!(registry.is_empty());
    }

    #[test]
    fn it_keeps_insertion_order() {
        let mut registry = MembershipRegistry::new();
        for id in &[5, 3, 9] {
            registry.add(*id);
        }
        assert_eq!(registry.list(), &[5, 3, 9]);
        assert_eq!(registry.index_of(&9), Some(2));
        assert_eq!(registry.index_of(&4), None);
    }

    #[test]
    fn later_members_shift_down_when_earlier_member_leaves() {
        let mut registry = MembershipRegistry::new();
        registry.add(1);
        registry.add(2);
        registry.add(3);
        assert_eq!(registry.participant(&3).expect("").name, "User 3");

        registry.remove(&1);
        assert_eq!(registry.index_of(&2), Some(0));
        assert_eq!(registry.index_of(&3), Some(1));

        let participant = registry.participant(&3).expect("");
        assert_eq!(participant.name, "User 2");
        assert_eq!(participant.color, PALETTE[1]);
    }

    #[test]
    fn colors_wrap_around_palette() {
        let mut registry = MembershipRegistry::new();
        for id in 0..(PALETTE.len() as ConnectionId + 2) {
            registry.add(id);
        }
        let participants = registry.participants();
        assert_eq!(participants[PALETTE.len()].color, PALETTE[0]);
        assert_eq!(participants[PALETTE.len() + 1].color, PALETTE[1]);
        assert_eq!(participants[PALETTE.len() + 1].name, "User 10");
    }
}
