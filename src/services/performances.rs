use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppResult;
use crate::models::performance::Performance;

const PERFORMANCE_COLUMNS: &str = "id, school_id, club_id, title, description, region, \
                                   theme_category, poster_image_url, performance_date, \
                                   created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreatePerformanceRequest {
    pub title: String,
    pub description: Option<String>,
    pub region: String,
    pub theme_category: String,
    pub poster_image_url: Option<String>,
    pub performance_date: NaiveDate,
    pub school_id: Option<i64>,
    pub club_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePerformanceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub theme_category: Option<String>,
    pub poster_image_url: Option<String>,
    pub performance_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceFilter {
    pub region: Option<String>,
    pub theme: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct PerformanceService;

impl PerformanceService {
    pub async fn list(pool: &PgPool, filter: &PerformanceFilter) -> AppResult<Vec<Performance>> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PERFORMANCE_COLUMNS} FROM performances WHERE 1=1"
        ));
        if let Some(region) = filter.region.as_deref().filter(|r| !r.is_empty()) {
            qb.push(" AND region = ").push_bind(region.to_string());
        }
        if let Some(theme) = filter.theme.as_deref().filter(|t| !t.is_empty()) {
            qb.push(" AND theme_category = ").push_bind(theme.to_string());
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND performance_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND performance_date <= ").push_bind(end_date);
        }
        qb.push(" ORDER BY performance_date DESC, id DESC");

        let performances = qb.build_query_as::<Performance>().fetch_all(pool).await?;
        Ok(performances)
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Option<Performance>> {
        let query = format!("SELECT {PERFORMANCE_COLUMNS} FROM performances WHERE id = $1");
        let performance = sqlx::query_as::<_, Performance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(performance)
    }

    pub async fn create(pool: &PgPool, req: CreatePerformanceRequest) -> AppResult<Performance> {
        let query = format!(
            "INSERT INTO performances \
             (school_id, club_id, title, description, region, theme_category, poster_image_url, performance_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PERFORMANCE_COLUMNS}"
        );
        let performance = sqlx::query_as::<_, Performance>(&query)
            .bind(req.school_id)
            .bind(req.club_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(&req.region)
            .bind(&req.theme_category)
            .bind(&req.poster_image_url)
            .bind(req.performance_date)
            .fetch_one(pool)
            .await?;
        Ok(performance)
    }

    /// Partial update: unset fields keep their current values.
    pub async fn update(
        pool: &PgPool,
        current: Performance,
        req: UpdatePerformanceRequest,
    ) -> AppResult<Performance> {
        let query = format!(
            "UPDATE performances SET \
             title = $2, description = $3, region = $4, theme_category = $5, \
             poster_image_url = $6, performance_date = $7, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PERFORMANCE_COLUMNS}"
        );
        let performance = sqlx::query_as::<_, Performance>(&query)
            .bind(current.id)
            .bind(req.title.unwrap_or(current.title))
            .bind(req.description.or(current.description))
            .bind(req.region.unwrap_or(current.region))
            .bind(req.theme_category.unwrap_or(current.theme_category))
            .bind(req.poster_image_url.or(current.poster_image_url))
            .bind(req.performance_date.unwrap_or(current.performance_date))
            .fetch_one(pool)
            .await?;
        Ok(performance)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM performances WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
