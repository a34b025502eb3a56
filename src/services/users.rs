use serde::Deserialize;
use sqlx::PgPool;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserRole};
use crate::security;

const USER_COLUMNS: &str = "id, email, password_hash, name, role, school_id, club_id";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub school_id: Option<i64>,
    pub club_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct UserService;

impl UserService {
    pub async fn signup(pool: &PgPool, req: SignupRequest) -> AppResult<User> {
        if !req.email.contains('@') {
            return Err(AppError::BadRequest("invalid email address".to_string()));
        }
        if req.password.len() < 8 {
            return Err(AppError::BadRequest(
                "password must be at least 8 characters".to_string(),
            ));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&req.email)
            .fetch_one(pool)
            .await?;
        if exists {
            return Err(AppError::Conflict("email is already in use".to_string()));
        }

        let password_hash = security::hash_password(&req.password)?;
        let query = format!(
            "INSERT INTO users (email, password_hash, name, role, school_id, club_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&req.email)
            .bind(&password_hash)
            .bind(req.name.trim())
            .bind(UserRole::User)
            .bind(req.school_id)
            .bind(req.club_id)
            .fetch_one(pool)
            .await?;

        tracing::info!("user {} signed up", user.id);
        Ok(user)
    }

    /// Verify credentials and issue an access token.
    pub async fn login(
        pool: &PgPool,
        auth: &AuthConfig,
        req: LoginRequest,
    ) -> AppResult<(String, User)> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&req.email)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("no user with that email".to_string()))?;

        if !security::verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        let token = security::create_access_token(
            user.id,
            user.role,
            &auth.secret,
            auth.access_token_ttl_minutes,
        )?;
        Ok((token, user))
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }
}
