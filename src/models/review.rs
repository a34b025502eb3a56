use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub performance_id: i64,
    pub author_user_id: i64,
    pub content: String,
    /// Private reviews stay visible to the author and the performing club's admins.
    pub is_public: bool,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
