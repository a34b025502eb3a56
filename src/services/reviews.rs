use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::review::Review;

const REVIEW_COLUMNS: &str =
    "id, performance_id, author_user_id, content, is_public, rating, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub content: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    pub rating: Option<i32>,
}

fn default_is_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub content: Option<String>,
    pub is_public: Option<bool>,
    pub rating: Option<i32>,
}

fn validate_content(content: &str) -> AppResult<()> {
    if content.is_empty() || content.chars().count() > 2000 {
        return Err(AppError::BadRequest(
            "review content must be between 1 and 2000 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_rating(rating: Option<i32>) -> AppResult<()> {
    if let Some(rating) = rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::BadRequest(
                "rating must be between 1 and 5".to_string(),
            ));
        }
    }
    Ok(())
}

pub struct ReviewService;

impl ReviewService {
    pub async fn create(
        pool: &PgPool,
        performance_id: i64,
        author_user_id: i64,
        req: CreateReviewRequest,
    ) -> AppResult<Review> {
        validate_content(&req.content)?;
        validate_rating(req.rating)?;

        let query = format!(
            "INSERT INTO reviews (performance_id, author_user_id, content, is_public, rating) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(performance_id)
            .bind(author_user_id)
            .bind(&req.content)
            .bind(req.is_public)
            .bind(req.rating)
            .fetch_one(pool)
            .await?;
        Ok(review)
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Option<Review>> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(review)
    }

    /// Reviews for a performance, newest-first. The base set is public
    /// reviews plus the viewer's own; admins of the performing club see
    /// every private review too.
    pub async fn list_for_performance(
        pool: &PgPool,
        performance_id: i64,
        viewer_id: i64,
        include_all_private: bool,
    ) -> AppResult<Vec<Review>> {
        let reviews = if include_all_private {
            let query = format!(
                "SELECT {REVIEW_COLUMNS} FROM reviews \
                 WHERE performance_id = $1 \
                 ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, Review>(&query)
                .bind(performance_id)
                .fetch_all(pool)
                .await?
        } else {
            let query = format!(
                "SELECT {REVIEW_COLUMNS} FROM reviews \
                 WHERE performance_id = $1 AND (is_public = TRUE OR author_user_id = $2) \
                 ORDER BY created_at DESC, id DESC"
            );
            sqlx::query_as::<_, Review>(&query)
                .bind(performance_id)
                .bind(viewer_id)
                .fetch_all(pool)
                .await?
        };
        Ok(reviews)
    }

    /// Partial update: unset fields keep their current values.
    pub async fn update(
        pool: &PgPool,
        current: Review,
        req: UpdateReviewRequest,
    ) -> AppResult<Review> {
        let content = req.content.unwrap_or(current.content);
        let rating = req.rating.or(current.rating);
        validate_content(&content)?;
        validate_rating(rating)?;

        let query = format!(
            "UPDATE reviews SET content = $2, is_public = $3, rating = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(current.id)
            .bind(&content)
            .bind(req.is_public.unwrap_or(current.is_public))
            .bind(rating)
            .fetch_one(pool)
            .await?;
        Ok(review)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(1)).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }

    #[test]
    fn content_bounds() {
        assert!(validate_content("fine").is_ok());
        assert!(validate_content("").is_err());
        assert!(validate_content(&"x".repeat(2001)).is_err());
    }
}
