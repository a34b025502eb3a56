use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::notification::Notification;

use super::{NewNotification, NotificationStore};

/// Vec-backed store with the same observable contract as the Postgres
/// implementation: monotonically increasing ids, newest-first listing,
/// idempotent mark-read.
#[derive(Default)]
pub struct MemoryNotificationStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: Vec<Notification>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let notification = Notification {
            id: inner.next_id,
            recipient_id: new.recipient_id,
            category: new.category,
            entity_id: new.entity_id,
            payload: new.payload,
            message: new.message,
            is_read: false,
            created_at: Utc::now(),
        };
        inner.rows.push(notification.clone());
        Ok(notification)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Notification>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        is_read: Option<bool>,
        page: i64,
        size: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let inner = self.inner.lock().await;
        let mut matching: Vec<Notification> = inner
            .rows
            .iter()
            .filter(|n| n.recipient_id == user_id)
            .filter(|n| is_read.map_or(true, |flag| n.is_read == flag))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let offset = ((page - 1) * size).max(0) as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(size.max(0) as usize)
            .collect();

        Ok((items, total))
    }

    async fn mark_read(&self, id: i64) -> AppResult<Notification> {
        let mut inner = self.inner.lock().await;
        match inner.rows.iter_mut().find(|n| n.id == id) {
            Some(row) => {
                row.is_read = true;
                Ok(row.clone())
            }
            None => Err(AppError::NotFound("notification not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationCategory;

    fn new_for(recipient_id: i64, message: &str) -> NewNotification {
        NewNotification {
            recipient_id,
            category: NotificationCategory::TradeStatus,
            entity_id: None,
            payload: None,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_creation_order() {
        let store = MemoryNotificationStore::new();
        let first = store.create(new_for(1, "first")).await.unwrap();
        let second = store.create(new_for(1, "second")).await.unwrap();
        assert!(second.id > first.id);
        assert!(!first.is_read);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_one_recipient() {
        let store = MemoryNotificationStore::new();
        store.create(new_for(1, "mine")).await.unwrap();
        store.create(new_for(2, "theirs")).await.unwrap();

        let (items, total) = store.list_for_user(1, None, 1, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].message, "mine");
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_not_found() {
        let store = MemoryNotificationStore::new();
        assert!(matches!(
            store.mark_read(99).await,
            Err(AppError::NotFound(_))
        ));
    }
}
