//! Request execution engine for the monitoring platform API.
//!
//! Every resource call funnels through [`Client::execute`], which resolves
//! credentials, dispatches under a [`CallContext`] with bounded retries,
//! and decodes the response envelope or classifies the failure.
//!
//! ```ignore
//! let client = Client::new(ClientConfig::new("https://api.example.com").with_auth(AuthConfig::token(token)))?;
//! let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
//! let probe: Decoded<StandardResponse<Probe>> = client.execute(&ctx, Request::get("/v1/probes/42")).await?;
//! ```

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;

#[cfg(test)]
mod tests;

pub use auth::AuthConfig;
pub use client::executor::RawResponse;
pub use client::{CallContext, Client, Decoded, Request};
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ConfigError};

pub use models::{ListOptions, PaginatedResponse, PaginationMeta, StandardResponse};

pub const USER_AGENT: &str = const_format::concatcp!("monitor-client/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_ID_HEADER: &str = "x-request-id";
