use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::pagination::Page;
use crate::services::community::{
    CommunityService, CreatePostRequest, PostFilter, UpdatePostRequest,
};

/// Posts may be modified by their author or a platform ADMIN.
fn ensure_can_modify(user: &AuthUser, author_id: i64) -> AppResult<()> {
    if user.id == author_id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the author or an admin can modify this post".to_string(),
        ))
    }
}

/// POST /community/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = CommunityService::create(&pool, user.id, req.into_inner()).await?;
    Ok(super::created(post))
}

/// GET /community/posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PostFilter>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner();
    let (items, total) = CommunityService::list(&pool, &filter).await?;
    let (page, size) = crate::pagination::clamp(filter.page, filter.size);
    Ok(super::ok(Page::new(items, page, size, total)))
}

/// GET /community/posts/{id}
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = CommunityService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
    Ok(super::ok(post))
}

/// PATCH /community/posts/{id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = CommunityService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
    ensure_can_modify(&user, post.author_id)?;
    let updated = CommunityService::update(&pool, post, req.into_inner()).await?;
    Ok(super::ok(updated))
}

/// DELETE /community/posts/{id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = CommunityService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
    ensure_can_modify(&user, post.author_id)?;
    CommunityService::delete(&pool, post.id).await?;
    Ok(super::no_content())
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/community")
            .route("/posts", web::post().to(create_post))
            .route("/posts", web::get().to(list_posts))
            .route("/posts/{id}", web::get().to(get_post))
            .route("/posts/{id}", web::patch().to(update_post))
            .route("/posts/{id}", web::delete().to(delete_post)),
    );
}
