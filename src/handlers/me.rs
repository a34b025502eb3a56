use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::services::schools::ClubService;
use crate::services::trade::TradeService;

/// GET /me/clubs: clubs the current user administers.
pub async fn my_clubs(pool: web::Data<PgPool>, user: AuthUser) -> AppResult<HttpResponse> {
    let clubs = ClubService::managed_by(&pool, user.id).await?;
    Ok(super::ok(clubs))
}

/// GET /me/reservations: the current user's trade reservations.
pub async fn my_reservations(pool: web::Data<PgPool>, user: AuthUser) -> AppResult<HttpResponse> {
    let reservations = TradeService::list_reservations_for_user(&pool, user.id).await?;
    Ok(super::ok(reservations))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .route("/clubs", web::get().to(my_clubs))
            .route("/reservations", web::get().to(my_reservations)),
    );
}
