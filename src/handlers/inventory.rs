use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::pagination::Page;
use crate::services::inventory::{
    CreateItemRequest, InventoryFilter, InventoryService, UpdateItemRequest,
};
use crate::services::schools::ClubService;

/// Mutating an item requires platform ADMIN or club-admin membership for the
/// owning club.
async fn ensure_can_manage(pool: &PgPool, user: &AuthUser, club_id: i64) -> AppResult<()> {
    if user.is_admin() || ClubService::is_admin(pool, club_id, user.id).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only admins of the owning club can manage its inventory".to_string(),
        ))
    }
}

/// GET /inventory/items
pub async fn list_items(
    pool: web::Data<PgPool>,
    query: web::Query<InventoryFilter>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner();
    let (items, total) = InventoryService::list(&pool, &filter).await?;
    let (page, size) = crate::pagination::clamp(filter.page, filter.size);
    Ok(super::ok(Page::new(items, page, size, total)))
}

/// POST /inventory/items
pub async fn create_item(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateItemRequest>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    ensure_can_manage(&pool, &user, req.club_id).await?;
    let item = InventoryService::create(&pool, req).await?;
    Ok(super::created(item))
}

/// GET /inventory/items/{id}
pub async fn get_item(pool: web::Data<PgPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let item = InventoryService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("inventory item not found".to_string()))?;
    Ok(super::ok(item))
}

/// PATCH /inventory/items/{id}
pub async fn update_item(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdateItemRequest>,
) -> AppResult<HttpResponse> {
    let item = InventoryService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("inventory item not found".to_string()))?;
    ensure_can_manage(&pool, &user, item.club_id).await?;
    let updated = InventoryService::update(&pool, item, req.into_inner()).await?;
    Ok(super::ok(updated))
}

/// DELETE /inventory/items/{id}
pub async fn delete_item(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let item = InventoryService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("inventory item not found".to_string()))?;
    ensure_can_manage(&pool, &user, item.club_id).await?;
    InventoryService::delete(&pool, item.id).await?;
    Ok(super::no_content())
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/inventory")
            .route("/items", web::get().to(list_items))
            .route("/items", web::post().to(create_item))
            .route("/items/{id}", web::get().to(get_item))
            .route("/items/{id}", web::patch().to(update_item))
            .route("/items/{id}", web::delete().to(delete_item)),
    );
}
