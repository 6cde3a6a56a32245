//! Response envelopes.
//!
//! Every success body from the platform is wrapped as
//! `{"status": "...", "message": "...", "data": <payload>}`; list endpoints
//! add a `"meta"` block and carry a sequence in `data`. Which of the two a
//! call expects is decided by the caller's type parameter, never by looking
//! at the body.

pub mod pagination;

use pagination::PaginationMeta;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A decodable response envelope.
///
/// Implemented by [`StandardResponse`] and [`PaginatedResponse`]. The
/// implementing type is the destination shape: decoding a list body into a
/// `StandardResponse<Probe>` fails instead of silently coercing.
pub trait Envelope: DeserializeOwned {
    fn status(&self) -> &str;

    fn message(&self) -> &str;

    /// Pagination metadata, if this envelope shape carries any.
    fn pagination(&self) -> Option<&PaginationMeta> {
        None
    }
}

/// Single-object envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResponse<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T: DeserializeOwned> Envelope for StandardResponse<T> {
    fn status(&self) -> &str {
        &self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// List envelope with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_empty",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T: DeserializeOwned> Envelope for PaginatedResponse<T> {
    fn status(&self) -> &str {
        &self.status
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn pagination(&self) -> Option<&PaginationMeta> {
        Some(&self.meta)
    }
}

// `"data": null` is how the platform reports an empty page.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
