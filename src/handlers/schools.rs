use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::schools::SchoolService;

/// GET /schools
pub async fn list_schools(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    let schools = SchoolService::list(&pool).await?;
    Ok(super::ok(schools))
}

/// GET /schools/{school_id}/clubs
pub async fn list_school_clubs(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let school_id = path.into_inner();
    let clubs = SchoolService::list_clubs(&pool, school_id).await?;
    Ok(super::ok(clubs))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/schools")
            .route("", web::get().to(list_schools))
            .route("/{school_id}/clubs", web::get().to(list_school_clubs)),
    );
}
