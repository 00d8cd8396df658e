use crate::message::{ConnectionId, PathData, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// `{author}-{created_at}-{sequence}`. The sequence is issued by the room and
/// never reused while the room lives, so two operations from the same author
/// in the same millisecond still get different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(author_id: ConnectionId, created_at: Timestamp, sequence: u64) -> Self {
        Self(format!("{}-{}-{}", author_id, created_at, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub kind: OperationKind,
    #[serde(rename = "userId")]
    pub author_id: ConnectionId,
    #[serde(rename = "pathData")]
    pub payload: PathData,
    #[serde(rename = "timestamp")]
    pub created_at: Timestamp,
}

impl Operation {
    pub fn draw(
        author_id: ConnectionId,
        payload: PathData,
        created_at: Timestamp,
        sequence: u64,
    ) -> Self {
        Self {
            id: OperationId::new(author_id, created_at, sequence),
            kind: OperationKind::Draw,
            author_id,
            payload,
            created_at,
        }
    }
}

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}
