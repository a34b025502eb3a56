use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppResult;
use crate::models::inventory::{InventoryItem, ItemStatus};
use crate::pagination;

const ITEM_COLUMNS: &str = "id, club_id, name, category, tags, size, contact, image_path, \
                            purchased_at, status, is_deal_done, description, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub club_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub size: Option<String>,
    pub contact: Option<String>,
    pub image_path: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub is_deal_done: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub size: Option<String>,
    pub contact: Option<String>,
    pub image_path: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub status: Option<ItemStatus>,
    pub is_deal_done: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryFilter {
    pub club_id: Option<i64>,
    pub status: Option<ItemStatus>,
    pub keyword: Option<String>,
    /// `field` for ascending, `-field` for descending; unknown fields fall
    /// back to id order.
    pub sort: Option<String>,
    #[serde(default = "pagination::default_page")]
    pub page: i64,
    #[serde(default = "pagination::default_size")]
    pub size: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &InventoryFilter) {
    if let Some(club_id) = filter.club_id {
        qb.push(" AND club_id = ").push_bind(club_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
        let pattern = format!("%{keyword}%");
        qb.push(" AND (name ILIKE ").push_bind(pattern.clone());
        qb.push(" OR category ILIKE ").push_bind(pattern.clone());
        qb.push(" OR tags ILIKE ").push_bind(pattern);
        qb.push(")");
    }
}

fn order_clause(sort: Option<&str>) -> String {
    let (field, descending) = match sort {
        Some(s) if s.starts_with('-') => (&s[1..], true),
        Some(s) => (s, false),
        None => ("id", false),
    };
    let column = match field {
        "name" | "category" | "status" | "purchased_at" | "created_at" | "updated_at" | "id" => {
            field
        }
        _ => "id",
    };
    let direction = if descending { "DESC" } else { "ASC" };
    format!(" ORDER BY {column} {direction}")
}

pub struct InventoryService;

impl InventoryService {
    pub async fn create(pool: &PgPool, req: CreateItemRequest) -> AppResult<InventoryItem> {
        let query = format!(
            "INSERT INTO inventory_items \
             (club_id, name, category, tags, size, contact, image_path, purchased_at, status, is_deal_done, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, InventoryItem>(&query)
            .bind(req.club_id)
            .bind(&req.name)
            .bind(&req.category)
            .bind(&req.tags)
            .bind(&req.size)
            .bind(&req.contact)
            .bind(&req.image_path)
            .bind(req.purchased_at)
            .bind(req.status.unwrap_or(ItemStatus::Available))
            .bind(req.is_deal_done)
            .bind(&req.description)
            .fetch_one(pool)
            .await?;
        Ok(item)
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Option<InventoryItem>> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1");
        let item = sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(item)
    }

    /// Partial update: unset fields keep their current values.
    pub async fn update(
        pool: &PgPool,
        current: InventoryItem,
        req: UpdateItemRequest,
    ) -> AppResult<InventoryItem> {
        let query = format!(
            "UPDATE inventory_items SET \
             name = $2, category = $3, tags = $4, size = $5, contact = $6, image_path = $7, \
             purchased_at = $8, status = $9, is_deal_done = $10, description = $11, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, InventoryItem>(&query)
            .bind(current.id)
            .bind(req.name.unwrap_or(current.name))
            .bind(req.category.or(current.category))
            .bind(req.tags.or(current.tags))
            .bind(req.size.or(current.size))
            .bind(req.contact.or(current.contact))
            .bind(req.image_path.or(current.image_path))
            .bind(req.purchased_at.or(current.purchased_at))
            .bind(req.status.unwrap_or(current.status))
            .bind(req.is_deal_done.unwrap_or(current.is_deal_done))
            .bind(req.description.or(current.description))
            .fetch_one(pool)
            .await?;
        Ok(item)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn list(
        pool: &PgPool,
        filter: &InventoryFilter,
    ) -> AppResult<(Vec<InventoryItem>, i64)> {
        let (page, size) = pagination::clamp(filter.page, filter.size);

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM inventory_items WHERE 1=1");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE 1=1"));
        push_filters(&mut qb, filter);
        qb.push(order_clause(filter.sort.as_deref()));
        qb.push(" LIMIT ").push_bind(size);
        qb.push(" OFFSET ").push_bind((page - 1) * size);
        let items = qb
            .build_query_as::<InventoryItem>()
            .fetch_all(pool)
            .await?;

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_whitelist() {
        assert_eq!(order_clause(None), " ORDER BY id ASC");
        assert_eq!(order_clause(Some("name")), " ORDER BY name ASC");
        assert_eq!(order_clause(Some("-created_at")), " ORDER BY created_at DESC");
        // Unknown or hostile fields fall back to id order.
        assert_eq!(order_clause(Some("password_hash")), " ORDER BY id ASC");
        assert_eq!(order_clause(Some("1; DROP TABLE users")), " ORDER BY id ASC");
    }
}
