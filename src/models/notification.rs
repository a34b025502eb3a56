use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kinds of events a user can be notified about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    ItemCheck,
    TradeStatus,
    PostComment,
    PostReply,
    RequestResponse,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::ItemCheck => "ITEM_CHECK",
            NotificationCategory::TradeStatus => "TRADE_STATUS",
            NotificationCategory::PostComment => "POST_COMMENT",
            NotificationCategory::PostReply => "POST_REPLY",
            NotificationCategory::RequestResponse => "REQUEST_RESPONSE",
        }
    }
}

/// Durable record of one event addressed to one recipient.
///
/// Immutable after creation except for `is_read`, which only ever moves
/// false -> true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub category: NotificationCategory,
    /// Related entity (post id, listing id, performance id, ...).
    pub entity_id: Option<i64>,
    /// Opaque serialized payload attached by the producing domain event.
    pub payload: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serialization_round_trip() {
        let categories = [
            NotificationCategory::ItemCheck,
            NotificationCategory::TradeStatus,
            NotificationCategory::PostComment,
            NotificationCategory::PostReply,
            NotificationCategory::RequestResponse,
        ];
        for category in categories {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: NotificationCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }
}
