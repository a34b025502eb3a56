use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::services::performances::{
    CreatePerformanceRequest, PerformanceFilter, PerformanceService, UpdatePerformanceRequest,
};
use crate::services::users::UserService;

/// Performances are managed by platform ADMINs or members of the owning club.
async fn ensure_can_manage(
    pool: &PgPool,
    user: &AuthUser,
    club_id: Option<i64>,
) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    if let Some(club_id) = club_id {
        let account = UserService::get(pool, user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;
        if account.club_id == Some(club_id) {
            return Ok(());
        }
    }
    Err(AppError::Forbidden(
        "no permission to manage this performance".to_string(),
    ))
}

/// GET /performances
pub async fn list_performances(
    pool: web::Data<PgPool>,
    query: web::Query<PerformanceFilter>,
) -> AppResult<HttpResponse> {
    let performances = PerformanceService::list(&pool, &query.into_inner()).await?;
    Ok(super::ok(performances))
}

/// GET /performances/{id}
pub async fn get_performance(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let performance = PerformanceService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("performance not found".to_string()))?;
    Ok(super::ok(performance))
}

/// POST /performances
pub async fn create_performance(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreatePerformanceRequest>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    ensure_can_manage(&pool, &user, req.club_id).await?;
    let performance = PerformanceService::create(&pool, req).await?;
    Ok(super::created(performance))
}

/// PATCH /performances/{id}
pub async fn update_performance(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdatePerformanceRequest>,
) -> AppResult<HttpResponse> {
    let performance = PerformanceService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("performance not found".to_string()))?;
    ensure_can_manage(&pool, &user, performance.club_id).await?;
    let updated = PerformanceService::update(&pool, performance, req.into_inner()).await?;
    Ok(super::ok(updated))
}

/// DELETE /performances/{id}
pub async fn delete_performance(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let performance = PerformanceService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("performance not found".to_string()))?;
    ensure_can_manage(&pool, &user, performance.club_id).await?;
    PerformanceService::delete(&pool, performance.id).await?;
    Ok(super::no_content())
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/performances")
            .route("", web::get().to(list_performances))
            .route("", web::post().to(create_performance))
            .route("/{id}", web::get().to(get_performance))
            .route("/{id}", web::patch().to(update_performance))
            .route("/{id}", web::delete().to(delete_performance))
            // Review routes share this prefix, so they are mounted here.
            .route(
                "/{performance_id}/reviews",
                web::post().to(super::reviews::create_review),
            )
            .route(
                "/{performance_id}/reviews",
                web::get().to(super::reviews::list_reviews),
            ),
    );
}
