pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod security;
pub mod services;
pub mod store;
pub mod websocket;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::Notifier;
pub use websocket::{ConnectionRegistry, WsMessage};
