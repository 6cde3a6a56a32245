//! Wire models for the monitoring platform API.
//!
//! Pure data: the response envelopes every endpoint wraps its payload in,
//! the structured error body, and the list query options. No I/O happens
//! here; `monitor-client` does the sending and decoding.

pub mod envelope;
pub mod error;
pub mod error_body;
pub mod list_options;

#[cfg(test)]
mod tests;

pub use envelope::pagination::PaginationMeta;
pub use envelope::{Envelope, PaginatedResponse, StandardResponse};
pub use error::model_error::ModelError;
pub use error_body::ApiErrorBody;
pub use list_options::builder::ListOptionsBuilder;
pub use list_options::{ListOptions, SortOrder};
