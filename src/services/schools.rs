use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::school::{Club, School};

pub struct SchoolService;

impl SchoolService {
    pub async fn list(pool: &PgPool) -> AppResult<Vec<School>> {
        let schools = sqlx::query_as::<_, School>(
            "SELECT id, name, region, code FROM schools ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        Ok(schools)
    }

    pub async fn list_clubs(pool: &PgPool, school_id: i64) -> AppResult<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            "SELECT id, school_id, name, description, genre FROM clubs \
             WHERE school_id = $1 ORDER BY name",
        )
        .bind(school_id)
        .fetch_all(pool)
        .await?;
        Ok(clubs)
    }
}

pub struct ClubService;

impl ClubService {
    /// Clubs the given user administers, via the club_admins join table.
    pub async fn managed_by(pool: &PgPool, user_id: i64) -> AppResult<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            "SELECT c.id, c.school_id, c.name, c.description, c.genre \
             FROM clubs c \
             JOIN club_admins ca ON ca.club_id = c.id \
             WHERE ca.user_id = $1 \
             ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(clubs)
    }

    /// Recipient set for club-addressed notifications.
    pub async fn admin_ids(pool: &PgPool, club_id: i64) -> AppResult<Vec<i64>> {
        let ids = sqlx::query_scalar("SELECT user_id FROM club_admins WHERE club_id = $1")
            .bind(club_id)
            .fetch_all(pool)
            .await?;
        Ok(ids)
    }

    pub async fn is_admin(pool: &PgPool, club_id: i64, user_id: i64) -> AppResult<bool> {
        let is_admin: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM club_admins WHERE club_id = $1 AND user_id = $2)",
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(is_admin)
    }
}
