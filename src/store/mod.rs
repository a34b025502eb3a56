//! Durable notification storage.
//!
//! `NotificationStore` is the persistence seam the dispatcher and the HTTP
//! boundary talk to. The Postgres implementation backs the running service;
//! the in-memory implementation backs the test suite and any storage-free
//! embedding.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::notification::{Notification, NotificationCategory};

pub mod memory;
pub mod postgres;

pub use memory::MemoryNotificationStore;
pub use postgres::PgNotificationStore;

/// Input for one notification row. The id, read flag and creation timestamp
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub category: NotificationCategory,
    pub entity_id: Option<i64>,
    pub payload: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification with a fresh id, `is_read = false` and a
    /// creation timestamp.
    async fn create(&self, new: NewNotification) -> AppResult<Notification>;

    async fn get(&self, id: i64) -> AppResult<Option<Notification>>;

    /// Notifications for one recipient, newest-first, optionally filtered by
    /// read flag. Returns the page slice plus the filtered total count.
    async fn list_for_user(
        &self,
        user_id: i64,
        is_read: Option<bool>,
        page: i64,
        size: i64,
    ) -> AppResult<(Vec<Notification>, i64)>;

    /// Set the read flag. Idempotent: marking an already-read notification
    /// succeeds and returns it unchanged. `NotFound` if the id is unknown.
    async fn mark_read(&self, id: i64) -> AppResult<Notification>;
}
