use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};
use crate::models::trade::{
    ReservationStatus, TradeDetail, TradeListItem, TradeListing, TradeReservation, TradeType,
};
use crate::pagination;

const LISTING_COLUMNS: &str = "id, inventory_item_id, title, description, trade_type, price, \
                               deposit, is_public, created_at, updated_at";

const RESERVATION_COLUMNS: &str =
    "id, listing_id, user_id, trade_type, start_at, end_at, message, status, created_at";

/// Marketplace feed rows: public listings over items that are still available.
const FEED_FROM: &str = "FROM trade_listings l \
                         JOIN inventory_items i ON l.inventory_item_id = i.id \
                         WHERE l.is_public = TRUE \
                           AND i.status = 'AVAILABLE' \
                           AND i.is_deal_done = FALSE";

#[derive(Debug, Deserialize)]
pub struct TradeFilter {
    pub keyword: Option<String>,
    pub trade_type: Option<TradeType>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub sort: Option<String>,
    #[serde(default = "pagination::default_page")]
    pub page: i64,
    #[serde(default = "pagination::default_size")]
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub inventory_item_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trade_type: TradeType,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub deposit: i64,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub trade_type: TradeType,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

fn push_feed_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &TradeFilter) {
    if let Some(trade_type) = filter.trade_type {
        qb.push(" AND l.trade_type = ").push_bind(trade_type);
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        qb.push(" AND i.category = ").push_bind(category.to_string());
    }
    if let Some(tag) = filter.tag.as_deref().filter(|t| !t.is_empty()) {
        qb.push(" AND i.tags ILIKE ").push_bind(format!("%{tag}%"));
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
        let pattern = format!("%{keyword}%");
        qb.push(" AND (i.name ILIKE ").push_bind(pattern.clone());
        qb.push(" OR i.category ILIKE ").push_bind(pattern.clone());
        qb.push(" OR i.tags ILIKE ").push_bind(pattern);
        qb.push(")");
    }
    if let Some(price_min) = filter.price_min {
        qb.push(" AND l.price >= ").push_bind(price_min);
    }
    if let Some(price_max) = filter.price_max {
        qb.push(" AND l.price <= ").push_bind(price_max);
    }
}

fn feed_order_clause(sort: Option<&str>) -> String {
    let (field, descending) = match sort {
        Some(s) if s.starts_with('-') => (&s[1..], true),
        Some(s) => (s, false),
        None => ("id", false),
    };
    let column = match field {
        "price" => "l.price",
        "deposit" => "l.deposit",
        "created_at" => "l.created_at",
        "name" => "i.name",
        _ => "l.id",
    };
    let direction = if descending { "DESC" } else { "ASC" };
    format!(" ORDER BY {column} {direction}")
}

pub struct TradeService;

impl TradeService {
    pub async fn list(pool: &PgPool, filter: &TradeFilter) -> AppResult<(Vec<TradeListItem>, i64)> {
        let (page, size) = pagination::clamp(filter.page, filter.size);

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT COUNT(*) {FEED_FROM}"));
        push_feed_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT l.id, l.trade_type, l.price, l.deposit, l.is_public, \
             i.id AS item_id, i.club_id, i.name, i.category, i.tags, i.image_path \
             {FEED_FROM}"
        ));
        push_feed_filters(&mut qb, filter);
        qb.push(feed_order_clause(filter.sort.as_deref()));
        qb.push(" LIMIT ").push_bind(size);
        qb.push(" OFFSET ").push_bind((page - 1) * size);
        let items = qb.build_query_as::<TradeListItem>().fetch_all(pool).await?;

        Ok((items, total))
    }

    pub async fn get_detail(pool: &PgPool, listing_id: i64) -> AppResult<Option<TradeDetail>> {
        let detail = sqlx::query_as::<_, TradeDetail>(
            "SELECT l.id, l.trade_type, l.price, l.deposit, l.is_public, l.title, l.description, \
             i.id AS item_id, i.club_id, i.name, i.category, i.tags, i.size, i.contact, \
             i.image_path, i.purchased_at, i.status, i.is_deal_done, \
             i.description AS item_description \
             FROM trade_listings l \
             JOIN inventory_items i ON l.inventory_item_id = i.id \
             WHERE l.id = $1",
        )
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;
        Ok(detail)
    }

    pub async fn create_listing(
        pool: &PgPool,
        req: CreateListingRequest,
    ) -> AppResult<TradeListing> {
        let already_listed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM trade_listings WHERE inventory_item_id = $1)",
        )
        .bind(req.inventory_item_id)
        .fetch_one(pool)
        .await?;
        if already_listed {
            return Err(AppError::Conflict(
                "inventory item already has a listing".to_string(),
            ));
        }

        let query = format!(
            "INSERT INTO trade_listings \
             (inventory_item_id, title, description, trade_type, price, deposit, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {LISTING_COLUMNS}"
        );
        let listing = sqlx::query_as::<_, TradeListing>(&query)
            .bind(req.inventory_item_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.trade_type)
            .bind(req.price)
            .bind(req.deposit)
            .bind(req.is_public)
            .fetch_one(pool)
            .await?;
        Ok(listing)
    }

    /// Club that owns the item behind a listing; used for permission checks
    /// and for addressing reservation notifications.
    pub async fn listing_club_id(pool: &PgPool, listing_id: i64) -> AppResult<Option<i64>> {
        let club_id = sqlx::query_scalar(
            "SELECT i.club_id FROM trade_listings l \
             JOIN inventory_items i ON l.inventory_item_id = i.id \
             WHERE l.id = $1",
        )
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;
        Ok(club_id)
    }

    /// Non-canceled reservations for a listing, oldest-first.
    pub async fn list_reservations(
        pool: &PgPool,
        listing_id: i64,
    ) -> AppResult<Vec<TradeReservation>> {
        let query = format!(
            "SELECT {RESERVATION_COLUMNS} FROM trade_reservations \
             WHERE listing_id = $1 AND status <> 'CANCELED' \
             ORDER BY created_at ASC"
        );
        let reservations = sqlx::query_as::<_, TradeReservation>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await?;
        Ok(reservations)
    }

    pub async fn list_reservations_for_user(
        pool: &PgPool,
        user_id: i64,
    ) -> AppResult<Vec<TradeReservation>> {
        let query = format!(
            "SELECT {RESERVATION_COLUMNS} FROM trade_reservations \
             WHERE user_id = $1 \
             ORDER BY created_at DESC"
        );
        let reservations = sqlx::query_as::<_, TradeReservation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(reservations)
    }

    pub async fn create_reservation(
        pool: &PgPool,
        listing_id: i64,
        user_id: i64,
        req: ReserveRequest,
    ) -> AppResult<TradeReservation> {
        if req.trade_type == TradeType::Rent {
            match (req.start_at, req.end_at) {
                (Some(start), Some(end)) if start < end => {}
                _ => {
                    return Err(AppError::BadRequest(
                        "rent reservations need a valid start/end period".to_string(),
                    ))
                }
            }
        }

        let query = format!(
            "INSERT INTO trade_reservations \
             (listing_id, user_id, trade_type, start_at, end_at, message) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RESERVATION_COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, TradeReservation>(&query)
            .bind(listing_id)
            .bind(user_id)
            .bind(req.trade_type)
            .bind(req.start_at)
            .bind(req.end_at)
            .bind(&req.message)
            .fetch_one(pool)
            .await?;
        Ok(reservation)
    }

    pub async fn get_reservation(pool: &PgPool, id: i64) -> AppResult<Option<TradeReservation>> {
        let query = format!("SELECT {RESERVATION_COLUMNS} FROM trade_reservations WHERE id = $1");
        let reservation = sqlx::query_as::<_, TradeReservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(reservation)
    }

    pub async fn set_reservation_status(
        pool: &PgPool,
        id: i64,
        status: ReservationStatus,
    ) -> AppResult<TradeReservation> {
        let query = format!(
            "UPDATE trade_reservations SET status = $2 WHERE id = $1 \
             RETURNING {RESERVATION_COLUMNS}"
        );
        sqlx::query_as::<_, TradeReservation>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("reservation not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_sort_maps_to_qualified_columns() {
        assert_eq!(feed_order_clause(None), " ORDER BY l.id ASC");
        assert_eq!(feed_order_clause(Some("-price")), " ORDER BY l.price DESC");
        assert_eq!(feed_order_clause(Some("name")), " ORDER BY i.name ASC");
        assert_eq!(feed_order_clause(Some("bogus")), " ORDER BY l.id ASC");
    }
}
