use actix::{
    Actor, ActorContext, AsyncContext, Handler, Message, Recipient, Running, StreamHandler,
};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use actix_web_actors::ws::{CloseCode, CloseReason};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::mpsc::Receiver;

use system::{ClientMessage, ConnectionId, RoomId, ServerMessage, DEFAULT_ROOM_ID};

use crate::connection_tx_storage::ConnectionTx;
use crate::gateway::{GatewayCommand, GatewayTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect {
        from: ConnectionId,
        room_id: RoomId,
        tx: ConnectionTx,
    },
    Disconnect {
        from: ConnectionId,
    },
    ClientMessage {
        from: ConnectionId,
        message: ClientMessage,
    },
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Message(ServerMessage),
    Disconnected,
}

/// Hands out participant ids at upgrade time, so a connection can report its
/// own disconnect even if the gateway has not processed its join yet.
pub struct ConnectionIdSource(AtomicU32);

impl ConnectionIdSource {
    pub fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    pub fn issue(&self) -> ConnectionId {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for ConnectionIdSource {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ConnectionSettings {
    /// Capacity of the outbound queue. A connection that lets it fill up is evicted.
    pub egress_buffer: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

/// Moves events from the egress queue into the actor mailbox, one at a time.
/// Waiting on each delivery means a client that stops reading leaves its
/// queue to fill up, at which point the gateway evicts it.
async fn pump_egress(
    connection_id: ConnectionId,
    mut rx: Receiver<ConnectionEvent>,
    addr: Recipient<ConnectionActorMessage>,
) {
    log::debug!("connection {} egress - started", connection_id);
    while let Some(event) = rx.recv().await {
        if let Err(err) = addr.send(ConnectionActorMessage(event)).await {
            log::debug!("connection {} egress - actor gone: {}", connection_id, err);
            break;
        }
    }
    // the gateway dropped our queue
    addr.do_send(ConnectionActorMessage(ConnectionEvent::Disconnected));
    log::debug!("connection {} egress - terminated", connection_id);
}

struct ConnectionActor {
    connection_id: ConnectionId,
    room_id: RoomId,
    gateway_tx: GatewayTx,
    egress_buffer: usize,
}

impl ConnectionActor {
    fn forward(&self, command: ConnectionCommand) -> bool {
        self.gateway_tx
            .send(GatewayCommand::ConnectionCommand(command))
            .is_ok()
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(self.egress_buffer);

        let connected = self.forward(ConnectionCommand::Connect {
            from: self.connection_id,
            room_id: self.room_id.clone(),
            tx,
        });
        if !connected {
            log::error!("Gateway is not running, closing connection {}", self.connection_id);
            ctx.stop();
            return;
        }

        ctx.set_mailbox_capacity(self.egress_buffer);
        let addr: Recipient<ConnectionActorMessage> = ctx.address().recipient();
        actix::spawn(pump_egress(self.connection_id, rx, addr));
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.forward(ConnectionCommand::Disconnect {
            from: self.connection_id,
        });
        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                log::debug!("Ingress size: {}", text.len());
                match ClientMessage::from_json(&text) {
                    Ok(message) => {
                        log::debug!("Ingress {:?}", message);
                        self.forward(ConnectionCommand::ClientMessage {
                            from: self.connection_id,
                            message,
                        });
                    }
                    Err(err) => {
                        log::warn!("Dropping message from {}: {}", self.connection_id, err)
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                ctx.close(Some(CloseReason {
                    code: CloseCode::Unsupported,
                    description: Some("binary frames are not supported".into()),
                }));
                ctx.stop();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                log::warn!("Protocol error on connection {}: {}", self.connection_id, err);
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0 {
            ConnectionEvent::Message(message) => {
                log::debug!("Egress {:?}", message);
                match message.to_json() {
                    Ok(text) => ctx.text(text),
                    Err(err) => log::warn!(
                        "Dropping egress frame for {}: {}",
                        self.connection_id,
                        err
                    ),
                }
            }
            ConnectionEvent::Disconnected => {
                ctx.close(Some(CloseReason {
                    code: CloseCode::Policy,
                    description: Some("evicted".into()),
                }));
                ctx.stop();
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    gateway_tx: web::Data<GatewayTx>,
    connection_ids: web::Data<ConnectionIdSource>,
    settings: web::Data<ConnectionSettings>,
) -> Result<HttpResponse, Error> {
    let room_id = req
        .match_info()
        .get("room_id")
        .unwrap_or(DEFAULT_ROOM_ID)
        .to_owned();
    let connection_id = connection_ids.issue();
    log::info!("Connection {} requested room {}", connection_id, room_id);
    ws::start(
        ConnectionActor {
            connection_id,
            room_id,
            gateway_tx: gateway_tx.get_ref().clone(),
            egress_buffer: settings.egress_buffer.max(1),
        },
        &req,
        stream,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection_tx_storage::{ConnectionTxStorage, SendError};
    use actix::ResponseFuture;
    use std::time::Duration;
    use system::{ClearEvent, ServerMessage};

    /// Accepts messages but never finishes handling them.
    struct StalledClient;

    impl Actor for StalledClient {
        type Context = actix::Context<Self>;
    }

    impl Handler<ConnectionActorMessage> for StalledClient {
        type Result = ResponseFuture<()>;

        fn handle(&mut self, _: ConnectionActorMessage, _: &mut Self::Context) -> Self::Result {
            Box::pin(std::future::pending())
        }
    }

    fn clear() -> ConnectionEvent {
        ConnectionEvent::Message(ServerMessage::Clear(ClearEvent { user_id: 1 }))
    }

    #[test]
    fn it_issues_increasing_ids_from_one() {
        let ids = ConnectionIdSource::default();
        assert_eq!(ids.issue(), 1);
        assert_eq!(ids.issue(), 2);
    }

    #[actix_web::test]
    async fn stalled_client_fills_its_queue() {
        let (tx, rx) = tokio::sync::mpsc::channel(2);
        let mut storage = ConnectionTxStorage::default();
        storage.insert(1, tx);
        actix::spawn(pump_egress(1, rx, StalledClient.start().recipient()));

        let mut result = Ok(());
        for _ in 0..10 {
            result = storage.send(&1, clear());
            if result.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(result, Err(SendError::Full));
    }
}
