pub mod community;
pub mod inventory;
pub mod notifier;
pub mod performances;
pub mod reviews;
pub mod schools;
pub mod trade;
pub mod users;

pub use community::CommunityService;
pub use inventory::InventoryService;
pub use notifier::Notifier;
pub use performances::PerformanceService;
pub use reviews::ReviewService;
pub use schools::{ClubService, SchoolService};
pub use trade::TradeService;
pub use users::UserService;
