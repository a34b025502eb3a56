use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use crate::websocket::{ConnectionRegistry, WsSession};

/// GET /ws/echo: WebSocket endpoint for echo, broadcast and server-pushed
/// notifications. `ws::start` completes the handshake; the session actor
/// registers itself afterwards.
pub async fn ws_echo(
    req: HttpRequest,
    stream: web::Payload,
    registry: web::Data<ConnectionRegistry>,
) -> Result<HttpResponse, actix_web::Error> {
    ws::start(WsSession::new(registry.get_ref().clone()), &req, stream)
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/ws").route("/echo", web::get().to(ws_echo)));
}
