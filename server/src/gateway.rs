use std::collections::HashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use system::{
    now_millis, ClearEvent, ClientMessage, ConnectionId, CursorMoveCommand, CursorMoveEvent,
    DrawCommand, DrawEvent, HistoryEvent, InitState, RoomId, ServerMessage, UserLeftEvent,
};

use crate::admin::AdminCommand;
use crate::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::room_coordinator::RoomCoordinator;

pub type GatewayTx = UnboundedSender<GatewayCommand>;

#[derive(Debug)]
pub enum GatewayCommand {
    ConnectionCommand(ConnectionCommand),
    AdminCommand(AdminCommand),
}

/// Translates connection traffic into room operations and fans the results
/// out. Runs inside a single task, so every room mutation and the broadcast
/// that follows it happen in one serialized step.
#[derive(Default)]
pub struct SessionGateway {
    rooms: RoomCoordinator,
    locations: HashMap<ConnectionId, RoomId>,
    connections: ConnectionTxStorage,
    lagging: Vec<ConnectionId>,
}

impl SessionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_command(&mut self, command: GatewayCommand) {
        match command {
            GatewayCommand::ConnectionCommand(command) => self.handle_connection_command(command),
            GatewayCommand::AdminCommand(command) => self.handle_admin_command(command),
        }
        self.evict_lagging();
    }

    fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { from, room_id, tx } => {
                if self.locations.contains_key(&from) {
                    log::warn!("Connection {} connected twice", from);
                    self.leave(&from);
                }
                self.connections.insert(from, tx);
                self.join(from, room_id);
            }
            ConnectionCommand::Disconnect { from } => {
                self.leave(&from);
                self.connections.remove(&from);
            }
            ConnectionCommand::ClientMessage { from, message } => {
                self.handle_client_message(from, message)
            }
        }
    }

    fn handle_admin_command(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::ListRooms { tx } => {
                if tx.send(self.rooms.describe()).is_err() {
                    log::warn!("Admin requester went away before the reply");
                }
            }
        }
    }

    fn join(&mut self, from: ConnectionId, room_id: RoomId) {
        let joined = self.rooms.join(&room_id, from);
        self.send(
            &from,
            ServerMessage::InitState(InitState {
                operations: joined.operations,
                users: joined.users,
            }),
        );
        if let Some(participant) = self.rooms.participant(&room_id, &from) {
            self.broadcast(&room_id, ServerMessage::UserJoined(participant), Some(&from));
        }
        self.locations.insert(from, room_id);
    }

    fn leave(&mut self, connection_id: &ConnectionId) {
        if let Some(room_id) = self.locations.remove(connection_id) {
            if self.rooms.leave(&room_id, *connection_id) {
                self.broadcast(
                    &room_id,
                    ServerMessage::UserLeft(UserLeftEvent {
                        user_id: *connection_id,
                    }),
                    Some(connection_id),
                );
            }
        }
    }

    fn handle_client_message(&mut self, from: ConnectionId, message: ClientMessage) {
        let room_id = match self.locations.get(&from) {
            Some(room_id) => room_id.clone(),
            None => {
                log::warn!("Ignoring message from connection {} outside any room", from);
                return;
            }
        };
        match message {
            ClientMessage::CursorMove(command) => self.relay_cursor_move(&room_id, from, command),
            ClientMessage::Draw(DrawCommand { path_data }) => {
                if let Some(operation) = self.rooms.record_draw(&room_id, from, path_data) {
                    self.broadcast(
                        &room_id,
                        ServerMessage::Draw(DrawEvent {
                            user_id: from,
                            path_data: operation.payload,
                            timestamp: operation.created_at,
                        }),
                        Some(&from),
                    );
                }
            }
            ClientMessage::Undo {} => {
                if self.rooms.request_undo(&room_id) {
                    self.broadcast(
                        &room_id,
                        ServerMessage::Undo(HistoryEvent {
                            user_id: from,
                            timestamp: now_millis(),
                        }),
                        None,
                    );
                }
            }
            ClientMessage::Redo {} => {
                if self.rooms.request_redo(&room_id) {
                    self.broadcast(
                        &room_id,
                        ServerMessage::Redo(HistoryEvent {
                            user_id: from,
                            timestamp: now_millis(),
                        }),
                        None,
                    );
                }
            }
            ClientMessage::Clear {} => {
                self.rooms.request_clear(&room_id);
                self.broadcast(
                    &room_id,
                    ServerMessage::Clear(ClearEvent { user_id: from }),
                    None,
                );
            }
        }
    }

    /// Cursor positions are relayed only; they never reach the operation log.
    fn relay_cursor_move(&mut self, room_id: &str, from: ConnectionId, command: CursorMoveCommand) {
        self.broadcast(
            room_id,
            ServerMessage::CursorMove(CursorMoveEvent {
                user_id: from,
                position: command.position,
            }),
            Some(&from),
        );
    }

    fn send(&mut self, to: &ConnectionId, message: ServerMessage) {
        if let Err(err) = self.connections.send(to, ConnectionEvent::Message(message)) {
            log::warn!("Cannot deliver to connection {}: {:?}", to, err);
            self.lagging.push(*to);
        }
    }

    fn broadcast(&mut self, room_id: &str, message: ServerMessage, without: Option<&ConnectionId>) {
        for connection_id in self.rooms.members(room_id) {
            if without.map_or(true, |c| c != connection_id) {
                let event = ConnectionEvent::Message(message.clone());
                if let Err(err) = self.connections.send(connection_id, event) {
                    log::warn!("Cannot deliver to connection {}: {:?}", connection_id, err);
                    self.lagging.push(*connection_id);
                }
            }
        }
    }

    /// Connections whose queue was full or closed are dropped as if they had
    /// disconnected. Leaving can make further connections lag, hence the loop.
    fn evict_lagging(&mut self) {
        while let Some(connection_id) = self.lagging.pop() {
            if !self.connections.contains(&connection_id) {
                continue;
            }
            log::warn!("Evicting connection {}", connection_id);
            let _ = self
                .connections
                .send(&connection_id, ConnectionEvent::Disconnected);
            // dropping the sender closes the queue, which also stops the connection
            self.connections.remove(&connection_id);
            self.leave(&connection_id);
        }
    }
}

pub fn spawn_gateway() -> GatewayTx {
    let (gateway_tx, mut gateway_rx) = unbounded_channel::<GatewayCommand>();

    tokio::spawn(async move {
        let mut gateway = SessionGateway::new();

        while let Some(command) = gateway_rx.recv().await {
            gateway.handle_command(command);
        }
        log::info!("Gateway terminated");
    });

    gateway_tx
}
