use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::notification::Notification;

use super::{NewNotification, NotificationStore};

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, category, entity_id, payload, message, is_read, created_at";

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        let query = format!(
            "INSERT INTO notifications (recipient_id, category, entity_id, payload, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );

        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(new.recipient_id)
            .bind(new.category)
            .bind(new.entity_id)
            .bind(new.payload)
            .bind(new.message)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(
            "created notification {} for user {}",
            notification.id,
            notification.recipient_id
        );
        Ok(notification)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Notification>> {
        let query = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1");
        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(notification)
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        is_read: Option<bool>,
        page: i64,
        size: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND ($2::boolean IS NULL OR is_read = $2)",
        )
        .bind(user_id)
        .bind(is_read)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_id = $1 AND ($2::boolean IS NULL OR is_read = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(is_read)
            .bind(size)
            .bind((page - 1) * size)
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn mark_read(&self, id: i64) -> AppResult<Notification> {
        let query = format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("notification not found".to_string()))
    }
}
