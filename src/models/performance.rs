use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Performance {
    pub id: i64,
    pub school_id: Option<i64>,
    pub club_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub region: String,
    pub theme_category: String,
    pub poster_image_url: Option<String>,
    pub performance_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
