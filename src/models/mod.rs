pub mod community;
pub mod inventory;
pub mod notification;
pub mod performance;
pub mod review;
pub mod school;
pub mod trade;
pub mod user;

pub use community::{CommunityPost, CommunityPostListItem, PostType};
pub use inventory::{InventoryItem, ItemStatus};
pub use notification::{Notification, NotificationCategory};
pub use performance::Performance;
pub use review::Review;
pub use school::{Club, School};
pub use trade::{ReservationStatus, TradeDetail, TradeListItem, TradeListing, TradeReservation, TradeType};
pub use user::{User, UserRole};
