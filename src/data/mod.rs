pub mod auth;
pub mod cache;
pub mod kalshi_api;
pub mod types;
