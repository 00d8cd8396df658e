use crate::room_coordinator::RoomDescription;
use tokio::sync::oneshot::Sender;

#[derive(Debug)]
pub enum AdminCommand {
    ListRooms { tx: Sender<Vec<RoomDescription>> },
}
