use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Availability of one inventory item inside a club's prop room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "item_status", rename_all = "UPPERCASE")]
pub enum ItemStatus {
    Available,
    Reserved,
    Rented,
    Sold,
    Unavailable,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "AVAILABLE",
            ItemStatus::Reserved => "RESERVED",
            ItemStatus::Rented => "RENTED",
            ItemStatus::Sold => "SOLD",
            ItemStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItem {
    pub id: i64,
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
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
