//! Real-time push over WebSockets.
//!
//! Three pieces:
//! 1. `ConnectionRegistry`: the process-wide set of live connections,
//!    shared by every request handler that wants to push.
//! 2. `protocol`: the `{kind, payload}` wire envelope and the inbound
//!    frame router (echo / broadcast / reserved server-push kind).
//! 3. `WsSession`: the actix actor backing one `/ws/echo` connection.
//!
//! The registry is constructed once at process start and injected via
//! `web::Data`; it is never a module-level singleton.

use std::fmt;

use uuid::Uuid;

pub mod protocol;
pub mod registry;
pub mod session;

pub use protocol::{handle_frame, WsMessage};
pub use registry::{ConnectionRegistry, DeliveryError};
pub use session::WsSession;

/// Opaque identity of one live connection.
///
/// Minted when the session actor is created; only used to address the
/// registry entry, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
