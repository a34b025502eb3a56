use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::user::User;
use crate::services::users::{LoginRequest, SignupRequest, UserService};

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    user: User,
}

/// POST /auth/signup
pub async fn signup(
    pool: web::Data<PgPool>,
    req: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let user = UserService::signup(&pool, req.into_inner()).await?;
    Ok(super::created(user))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let (access_token, user) = UserService::login(&pool, &config.auth, req.into_inner()).await?;
    Ok(super::ok(TokenResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// GET /auth/admin-test, smoke endpoint for role-gated access.
pub async fn admin_test(user: AuthUser) -> AppResult<HttpResponse> {
    user.require_admin()?;
    Ok(super::ok(json!({
        "message": "admin access granted",
        "user_id": user.id,
    })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/admin-test", web::get().to(admin_test)),
    );
}
