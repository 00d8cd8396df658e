use crate::connection::ConnectionEvent;
use std::collections::HashMap;
use system::ConnectionId;
use tokio::sync::mpsc::error::TrySendError;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

#[derive(Debug, PartialEq)]
pub enum SendError {
    /// The connection stopped draining its queue.
    Full,
    /// The connection actor is gone.
    Closed,
    Unknown,
}

/// Egress queues of every connected client. Sending never waits: a queue that
/// is full or closed is reported back so the gateway can evict its owner.
#[derive(Default)]
pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connection_txs.contains_key(connection_id)
    }

    pub fn send(&self, to: &ConnectionId, event: ConnectionEvent) -> Result<(), SendError> {
        match self.connection_txs.get(to) {
            Some(tx) => tx.try_send(event).map_err(|err| match err {
                TrySendError::Full(_) => SendError::Full,
                TrySendError::Closed(_) => SendError::Closed,
            }),
            None => Err(SendError::Unknown),
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }
}
