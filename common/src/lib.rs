//! Shared primitives for the monitor client workspace.
//!
//! Nothing in here knows about HTTP requests or envelopes. These are the
//! small building blocks every other crate leans on:
//!
//! - [`ErrorLocation`]: file/line/column captured at the point an error is built
//! - [`RedactedSecret`]: credential material that never prints its value
//! - [`HttpStatusCode`]: status classification used by retry and error mapping

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::{REDACTED_MASK, RedactedSecret};
