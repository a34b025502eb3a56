use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web_actors::ws;
use tokio::sync::mpsc;

use super::registry::ConnectionRegistry;
use super::{protocol, ConnectionId};

/// Registry-pushed text on its way out through this session's socket.
#[derive(ActixMessage)]
#[rtype(result = "()")]
struct PushText(String);

/// Actor backing one `/ws/echo` connection.
///
/// Lifecycle: `ws::start` completes the handshake, then `started` registers
/// the connection and begins forwarding registry pushes into the socket;
/// `stopped` unregisters exactly once regardless of how the session ended
/// (client close, protocol error, or eviction after a failed push).
pub struct WsSession {
    id: ConnectionId,
    registry: ConnectionRegistry,
    sender: mpsc::UnboundedSender<String>,
    receiver: Option<mpsc::UnboundedReceiver<String>>,
}

impl WsSession {
    pub fn new(registry: ConnectionRegistry) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            id: ConnectionId::new(),
            registry,
            sender,
            receiver: Some(receiver),
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("websocket session {} connected", self.id);

        let registry = self.registry.clone();
        let id = self.id;
        let sender = self.sender.clone();
        actix::spawn(async move {
            registry.register(id, sender).await;
        });

        // Drain the registry channel into the actor mailbox. The task ends
        // when every sender clone is gone (session stopped + registry evicted).
        if let Some(mut receiver) = self.receiver.take() {
            let addr = ctx.address();
            actix::spawn(async move {
                while let Some(text) = receiver.recv().await {
                    addr.do_send(PushText(text));
                }
            });
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("websocket session {} disconnected", self.id);

        let registry = self.registry.clone();
        let id = self.id;
        actix::spawn(async move {
            registry.unregister(id).await;
        });
    }
}

impl Handler<PushText> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: PushText, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let registry = self.registry.clone();
                let id = self.id;
                actix::spawn(async move {
                    protocol::handle_frame(&registry, id, &text).await;
                });
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!("binary frames not supported on session {}", self.id);
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!("websocket protocol error on session {}: {e}", self.id);
                ctx.stop();
            }
            _ => {}
        }
    }
}
