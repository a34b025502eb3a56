use std::sync::Arc;

use crate::error::AppResult;
use crate::models::notification::{Notification, NotificationCategory};
use crate::store::{NewNotification, NotificationStore};
use crate::websocket::{ConnectionRegistry, WsMessage};

/// Single entry point domain logic uses to persist and push a notification.
///
/// The store write is the durability step; the live push is a best-effort
/// convenience on top. A recipient without an open connection is a normal,
/// non-error state: the record waits in the store until listed.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
    registry: ConnectionRegistry,
}

impl Notifier {
    pub fn new(store: Arc<dyn NotificationStore>, registry: ConnectionRegistry) -> Self {
        Self { store, registry }
    }

    /// Persist one notification, then push it to every open connection.
    ///
    /// A store failure is fatal to this call and propagated; a push failure
    /// never is. The persisted record is returned regardless of delivery.
    pub async fn notify_user(
        &self,
        recipient_id: i64,
        category: NotificationCategory,
        message: &str,
        entity_id: Option<i64>,
        payload: Option<String>,
    ) -> AppResult<Notification> {
        let notification = self
            .store
            .create(NewNotification {
                recipient_id,
                category,
                entity_id,
                payload,
                message: message.to_string(),
            })
            .await?;

        let envelope = WsMessage::Notification {
            data: notification.clone(),
        };
        match envelope.to_json() {
            Ok(text) => self.registry.broadcast(text).await,
            Err(e) => tracing::warn!("failed to encode notification push: {e}"),
        }

        Ok(notification)
    }

    /// Fan out one notification per recipient. A failing recipient is logged
    /// and skipped; the rest are still notified.
    pub async fn notify_each(
        &self,
        recipients: &[i64],
        category: NotificationCategory,
        message: &str,
        entity_id: Option<i64>,
        payload: Option<String>,
    ) {
        for &recipient_id in recipients {
            if let Err(e) = self
                .notify_user(recipient_id, category, message, entity_id, payload.clone())
                .await
            {
                tracing::warn!("failed to notify user {recipient_id}: {e}");
            }
        }
    }
}
