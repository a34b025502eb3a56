//! Request identity extraction.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::config::Config;
use crate::error::AppError;
use crate::models::user::UserRole;
use crate::security;

/// Identity of the authenticated caller, decoded from the Bearer token.
/// Claims-only: handlers that need the full user row load it themselves.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("admin role required".to_string()))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("auth config not registered")))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let claims = security::decode_token(token, &config.auth.secret)?;
    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("invalid token subject".to_string()))?;

    Ok(AuthUser {
        id,
        role: claims.role,
    })
}
