//! Envelope decoding.
//!
//! The destination type decides the shape. Nothing here inspects the body to
//! guess whether it is a single object or a list.

use crate::error::ClientError;

use common::ErrorLocation;
use models::{Envelope, PaginationMeta};

use std::panic::Location;

const EMPTY_BODY: &[u8] = b"{}";

/// Decode a 2xx body into envelope `E`.
///
/// An empty body is read as `{}`: a single-object envelope decodes with no
/// `data`, a paginated envelope fails for lack of `meta`. A
/// [`ClientError::Decode`] points at the caller, not at this function.
#[track_caller]
pub fn decode<E>(body: &[u8]) -> Result<E, ClientError>
where
    E: Envelope,
{
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        EMPTY_BODY
    } else {
        body
    };
    let location = ErrorLocation::from(Location::caller());
    serde_json::from_slice(body).map_err(|source| ClientError::Decode {
        message: source.to_string(),
        location,
        source,
    })
}

/// Decode into an existing destination, returning its pagination metadata.
///
/// `destination` is only overwritten when decoding succeeds.
#[track_caller]
pub fn decode_into<E>(body: &[u8], destination: &mut E) -> Result<Option<PaginationMeta>, ClientError>
where
    E: Envelope,
{
    *destination = decode(body)?;
    Ok(destination.pagination().cloned())
}
