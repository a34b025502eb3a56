use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::notification::NotificationCategory;
use crate::models::performance::Performance;
use crate::services::notifier::Notifier;
use crate::services::performances::PerformanceService;
use crate::services::reviews::{CreateReviewRequest, ReviewService, UpdateReviewRequest};
use crate::services::schools::ClubService;
use crate::services::users::UserService;

/// Admins of the performing club read every private review.
async fn is_admin_of_performance(
    pool: &PgPool,
    user: &AuthUser,
    performance: &Performance,
) -> AppResult<bool> {
    if !user.is_admin() {
        return Ok(false);
    }
    let account = UserService::get(pool, user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;
    Ok(account.club_id.is_some() && account.club_id == performance.club_id)
}

async fn load_performance(pool: &PgPool, id: i64) -> AppResult<Performance> {
    PerformanceService::get(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("performance not found".to_string()))
}

/// POST /performances/{performance_id}/reviews
///
/// A fresh review is surfaced to the performing club's admins as a
/// POST_COMMENT notification.
pub async fn create_review(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<CreateReviewRequest>,
) -> AppResult<HttpResponse> {
    let performance = load_performance(&pool, path.into_inner()).await?;
    let review = ReviewService::create(&pool, performance.id, user.id, req.into_inner()).await?;

    if let Some(club_id) = performance.club_id {
        let admins = ClubService::admin_ids(&pool, club_id).await?;
        notifier
            .notify_each(
                &admins,
                NotificationCategory::PostComment,
                "A new review was posted on your performance.",
                Some(performance.id),
                None,
            )
            .await;
    }

    Ok(super::created(review))
}

/// GET /performances/{performance_id}/reviews
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let performance = load_performance(&pool, path.into_inner()).await?;
    let include_all_private = is_admin_of_performance(&pool, &user, &performance).await?;
    let reviews =
        ReviewService::list_for_performance(&pool, performance.id, user.id, include_all_private)
            .await?;
    Ok(super::ok(reviews))
}

/// PATCH /reviews/{review_id}, author only.
pub async fn update_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdateReviewRequest>,
) -> AppResult<HttpResponse> {
    let review = ReviewService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("review not found".to_string()))?;
    if review.author_user_id != user.id {
        return Err(AppError::Forbidden(
            "only the author can edit this review".to_string(),
        ));
    }
    let updated = ReviewService::update(&pool, review, req.into_inner()).await?;
    Ok(super::ok(updated))
}

/// DELETE /reviews/{review_id}, author only.
pub async fn delete_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let review = ReviewService::get(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("review not found".to_string()))?;
    if review.author_user_id != user.id {
        return Err(AppError::Forbidden(
            "only the author can delete this review".to_string(),
        ));
    }
    ReviewService::delete(&pool, review.id).await?;
    Ok(super::no_content())
}

/// The performance-nested review routes live in the performances scope; only
/// the standalone /reviews paths are registered here.
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("/{review_id}", web::patch().to(update_review))
            .route("/{review_id}", web::delete().to(delete_review)),
    );
}
