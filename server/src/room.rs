use system::{now_millis, ConnectionId, MembershipRegistry, Operation, OperationLog, PathData};

#[derive(Default)]
pub struct Room {
    pub log: OperationLog,
    pub members: MembershipRegistry,
    next_sequence: u64,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_draw(&mut self, author_id: ConnectionId, payload: PathData) -> Operation {
        let sequence = self.next_sequence;
        // not reset by clear, ids stay unique for the lifetime of the room
        self.next_sequence += 1;
        let operation = Operation::draw(author_id, payload, now_millis(), sequence);
        self.log.append(operation.clone());
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::serde_json::json;

    #[test]
    fn it_numbers_operations_per_room() {
        let mut room = Room::default();
        let first = room.record_draw(1, PathData(json!({"color": "#000"})));
        let second = room.record_draw(1, PathData(json!({"color": "#fff"})));
        assert!(first.id.as_str().ends_with("-0"));
        assert!(second.id.as_str().ends_with("-1"));
        assert_eq!(room.log.len(), 2);
    }
}
