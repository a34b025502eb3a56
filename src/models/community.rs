use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "community_post_type", rename_all = "lowercase")]
pub enum PostType {
    General,
    Request,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommunityPost {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub author_id: i64,
    pub club_id: Option<i64>,
    pub request_category: Option<String>,
    pub desired_start_date: Option<NaiveDate>,
    pub desired_end_date: Option<NaiveDate>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feed row: full content is trimmed down to a preview server-side.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommunityPostListItem {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub preview: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
}
