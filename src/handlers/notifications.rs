use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::pagination::{self, Page};
use crate::store::NotificationStore;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    pub is_read: Option<bool>,
    #[serde(default = "pagination::default_page")]
    pub page: i64,
    #[serde(default = "pagination::default_size")]
    pub size: i64,
}

/// GET /notifications: the caller's notifications, newest-first.
pub async fn list_notifications(
    store: web::Data<Arc<dyn NotificationStore>>,
    user: AuthUser,
    query: web::Query<NotificationListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let (page, size) = pagination::clamp(query.page, query.size);
    let (items, total) = store
        .list_for_user(user.id, query.is_read, page, size)
        .await?;
    Ok(super::ok(Page::new(items, page, size, total)))
}

/// POST /notifications/{id}/read
///
/// Recipient-match is enforced here, before the store is touched for the
/// write; marking an already-read notification is a no-op success.
pub async fn mark_notification_read(
    store: web::Data<Arc<dyn NotificationStore>>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let notification = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("notification not found".to_string()))?;

    if notification.recipient_id != user.id {
        return Err(AppError::Forbidden(
            "only the recipient can mark this notification read".to_string(),
        ));
    }

    let updated = store.mark_read(id).await?;
    Ok(super::ok(updated))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(list_notifications))
            .route("/{id}/read", web::post().to(mark_notification_read)),
    );
}
