use crate::operation::Operation;
use serde::{Deserialize, Serialize};

pub type ConnectionId = u32;
pub type RoomId = String;
pub type Timestamp = u64;

pub const DEFAULT_ROOM_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Stroke description as sent by the front end (points, color, size, tool).
/// Kept as raw JSON and never inspected, so numbers keep their precision and
/// fields the server does not know about are relayed as they came.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathData(pub serde_json::Value);

impl PathData {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    Malformed(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Malformed(reason) => write!(f, "malformed message: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    Draw(DrawCommand),
    CursorMove(CursorMoveCommand),
    Undo {},
    Redo {},
    Clear {},
}

impl ClientMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|err| ProtocolError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawCommand {
    pub path_data: PathData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorMoveCommand {
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    InitState(InitState),
    Draw(DrawEvent),
    CursorMove(CursorMoveEvent),
    Undo(HistoryEvent),
    Redo(HistoryEvent),
    Clear(ClearEvent),
    UserJoined(Participant),
    UserLeft(UserLeftEvent),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitState {
    pub operations: Vec<Operation>,
    pub users: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEvent {
    pub user_id: ConnectionId,
    pub path_data: PathData,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMoveEvent {
    pub user_id: ConnectionId,
    pub position: Point,
}

/// Payload of both `undo` and `redo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub user_id: ConnectionId,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearEvent {
    pub user_id: ConnectionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftEvent {
    pub user_id: ConnectionId,
}

/// A room member together with its derived display attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: ConnectionId,
    pub color: String,
    pub name: String,
}
