pub mod api;
pub mod client;
pub mod config;

pub use api::ApiError;
pub use client::ClientError;
pub use config::ConfigError;
