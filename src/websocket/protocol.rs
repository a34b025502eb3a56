use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::notification::Notification;

use super::registry::ConnectionRegistry;
use super::ConnectionId;

/// Outbound wire envelope. Serializes to `{"kind": ..., ...}`.
///
/// `notification` is reserved for server pushes; clients are not permitted
/// to originate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WsMessage {
    Echo { payload: Value },
    Broadcast { payload: Value },
    Notification { data: Notification },
}

impl WsMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Loose inbound frame. Anything that fails to decode into this shape is
/// treated as an opaque echo payload.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Interpret a single text frame received on `origin` and produce zero or
/// one outbound action.
///
/// Dispatch precedence:
/// 1. reserved `notification` kind -> discarded silently
/// 2. `broadcast` -> re-wrapped and fanned out to every connection
/// 3. anything else (explicit `echo`, unknown kinds, malformed input) ->
///    echoed back to the sender only
///
/// Never fails the connection: a malformed frame degrades to an echo of the
/// raw text, and a failed echo send just means the peer is already gone.
pub async fn handle_frame(registry: &ConnectionRegistry, origin: ConnectionId, raw: &str) {
    let frame = match serde_json::from_str::<InboundFrame>(raw) {
        Ok(frame) => frame,
        Err(_) => InboundFrame {
            kind: None,
            payload: Value::String(raw.to_string()),
        },
    };

    match frame.kind.as_deref() {
        Some("notification") => {
            // Server-push kind; client-originated frames of this kind are dropped.
            tracing::debug!("connection {origin} sent reserved kind, ignoring");
        }
        Some("broadcast") => {
            let outbound = WsMessage::Broadcast {
                payload: frame.payload,
            };
            match outbound.to_json() {
                Ok(text) => registry.broadcast(text).await,
                Err(e) => tracing::warn!("failed to encode broadcast envelope: {e}"),
            }
        }
        _ => {
            let outbound = WsMessage::Echo {
                payload: frame.payload,
            };
            match outbound.to_json() {
                Ok(text) => {
                    if let Err(e) = registry.send_to(origin, text).await {
                        tracing::debug!("echo delivery failed: {e}");
                    }
                }
                Err(e) => tracing::warn!("failed to encode echo envelope: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn echo_envelope_wire_shape() {
        let msg = WsMessage::Echo {
            payload: json!("hello"),
        };
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"kind": "echo", "payload": "hello"}));
    }

    #[test]
    fn broadcast_envelope_wire_shape() {
        let msg = WsMessage::Broadcast {
            payload: json!({"a": 1}),
        };
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"kind": "broadcast", "payload": {"a": 1}}));
    }

    #[test]
    fn notification_envelope_uses_data_field() {
        let notification = Notification {
            id: 9,
            recipient_id: 7,
            category: crate::models::NotificationCategory::TradeStatus,
            entity_id: Some(3),
            payload: None,
            message: "reservation confirmed".to_string(),
            is_read: false,
            created_at: chrono::Utc::now(),
        };
        let msg = WsMessage::Notification { data: notification };
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["kind"], "notification");
        assert_eq!(value["data"]["id"], 9);
        assert_eq!(value["data"]["recipient_id"], 7);
        assert_eq!(value["data"]["category"], "TRADE_STATUS");
        assert_eq!(value["data"]["is_read"], false);
    }

    #[test]
    fn inbound_frame_defaults_missing_fields() {
        let frame: InboundFrame = serde_json::from_str("{}").unwrap();
        assert_eq!(frame.kind, None);
        assert_eq!(frame.payload, Value::Null);
    }

    #[test]
    fn inbound_frame_rejects_non_objects() {
        assert!(serde_json::from_str::<InboundFrame>("42").is_err());
        assert!(serde_json::from_str::<InboundFrame>("\"hello\"").is_err());
        assert!(serde_json::from_str::<InboundFrame>("not json at all").is_err());
    }
}
