use actix_web::{web, HttpResponse};
use serde::Serialize;

pub mod auth;
pub mod community;
pub mod inventory;
pub mod me;
pub mod notifications;
pub mod performances;
pub mod realtime;
pub mod reviews;
pub mod schools;
pub mod trade;

/// Uniform success envelope; error responses take the matching shape through
/// `AppError`'s `ResponseError` impl.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Mounts every domain under the caller's scope (`/api/v1`).
pub fn configure(cfg: &mut web::ServiceConfig) {
    auth::register_routes(cfg);
    schools::register_routes(cfg);
    me::register_routes(cfg);
    inventory::register_routes(cfg);
    trade::register_routes(cfg);
    community::register_routes(cfg);
    performances::register_routes(cfg);
    reviews::register_routes(cfg);
    notifications::register_routes(cfg);
}
