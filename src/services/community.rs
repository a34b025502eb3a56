use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppResult;
use crate::models::community::{CommunityPost, CommunityPostListItem, PostType};
use crate::pagination;

const POST_COLUMNS: &str = "id, type, title, content, image_url, tags, author_id, club_id, \
                            request_category, desired_start_date, desired_end_date, like_count, \
                            created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub club_id: Option<i64>,
    pub request_category: Option<String>,
    pub desired_start_date: Option<NaiveDate>,
    pub desired_end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub club_id: Option<i64>,
    pub request_category: Option<String>,
    pub desired_start_date: Option<NaiveDate>,
    pub desired_end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PostFilter {
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    /// Matched against title, content and tags.
    pub keyword: Option<String>,
    #[serde(default = "pagination::default_page")]
    pub page: i64,
    #[serde(default = "pagination::default_size")]
    pub size: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    if let Some(post_type) = filter.post_type {
        qb.push(" AND type = ").push_bind(post_type);
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
        let pattern = format!("%{keyword}%");
        qb.push(" AND (title ILIKE ").push_bind(pattern.clone());
        qb.push(" OR content ILIKE ").push_bind(pattern.clone());
        qb.push(" OR tags ILIKE ").push_bind(pattern);
        qb.push(")");
    }
}

pub struct CommunityService;

impl CommunityService {
    pub async fn create(
        pool: &PgPool,
        author_id: i64,
        req: CreatePostRequest,
    ) -> AppResult<CommunityPost> {
        let query = format!(
            "INSERT INTO community_posts \
             (type, title, content, image_url, tags, author_id, club_id, request_category, \
              desired_start_date, desired_end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, CommunityPost>(&query)
            .bind(req.post_type)
            .bind(&req.title)
            .bind(&req.content)
            .bind(&req.image_url)
            .bind(&req.tags)
            .bind(author_id)
            .bind(req.club_id)
            .bind(&req.request_category)
            .bind(req.desired_start_date)
            .bind(req.desired_end_date)
            .fetch_one(pool)
            .await?;
        Ok(post)
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Option<CommunityPost>> {
        let query = format!("SELECT {POST_COLUMNS} FROM community_posts WHERE id = $1");
        let post = sqlx::query_as::<_, CommunityPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(post)
    }

    pub async fn list(
        pool: &PgPool,
        filter: &PostFilter,
    ) -> AppResult<(Vec<CommunityPostListItem>, i64)> {
        let (page, size) = pagination::clamp(filter.page, filter.size);

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM community_posts WHERE 1=1");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, type, title, LEFT(content, 120) AS preview, image_url, tags, \
             like_count, created_at \
             FROM community_posts WHERE 1=1",
        );
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC");
        qb.push(" LIMIT ").push_bind(size);
        qb.push(" OFFSET ").push_bind((page - 1) * size);
        let items = qb
            .build_query_as::<CommunityPostListItem>()
            .fetch_all(pool)
            .await?;

        Ok((items, total))
    }

    /// Partial update: unset fields keep their current values.
    pub async fn update(
        pool: &PgPool,
        current: CommunityPost,
        req: UpdatePostRequest,
    ) -> AppResult<CommunityPost> {
        let query = format!(
            "UPDATE community_posts SET \
             title = $2, content = $3, image_url = $4, tags = $5, club_id = $6, \
             request_category = $7, desired_start_date = $8, desired_end_date = $9, \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, CommunityPost>(&query)
            .bind(current.id)
            .bind(req.title.unwrap_or(current.title))
            .bind(req.content.unwrap_or(current.content))
            .bind(req.image_url.or(current.image_url))
            .bind(req.tags.or(current.tags))
            .bind(req.club_id.or(current.club_id))
            .bind(req.request_category.or(current.request_category))
            .bind(req.desired_start_date.or(current.desired_start_date))
            .bind(req.desired_end_date.or(current.desired_end_date))
            .fetch_one(pool)
            .await?;
        Ok(post)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM community_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
