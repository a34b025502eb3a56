use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::inventory::ItemStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "trade_type", rename_all = "UPPERCASE")]
pub enum TradeType {
    Rent,
    Sell,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "reservation_status", rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
}

/// One listing per inventory item.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TradeListing {
    pub id: i64,
    pub inventory_item_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trade_type: TradeType,
    pub price: i64,
    pub deposit: i64,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row joined with the minimum item fields the marketplace feed needs.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TradeListItem {
    pub id: i64,
    pub trade_type: TradeType,
    pub price: i64,
    pub deposit: i64,
    pub is_public: bool,
    pub item_id: i64,
    pub club_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub image_path: Option<String>,
}

/// Listing joined with the full item record for the detail page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TradeDetail {
    pub id: i64,
    pub trade_type: TradeType,
    pub price: i64,
    pub deposit: i64,
    pub is_public: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub item_id: i64,
    pub club_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub size: Option<String>,
    pub contact: Option<String>,
    pub image_path: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub is_deal_done: bool,
    pub item_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TradeReservation {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub trade_type: TradeType,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}
