//! Turns the active credential scheme plus per-request overrides into headers.

use crate::auth::{
    ACCESS_KEY_HEADER, ACCESS_SECRET_HEADER, AuthConfig, REGISTRATION_KEY_HEADER,
    SERVER_SECRET_HEADER, SERVER_UUID_HEADER, is_credential_header,
};
use crate::error::ClientError;

use common::REDACTED_MASK;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

/// Resolve the headers to attach for one call.
///
/// Precedence, highest first:
/// 1. explicit overrides: if they carry any credential header, the configured
///    scheme contributes nothing at all; every override is applied last
/// 2. server identity
/// 3. API key pair
/// 4. bearer token
/// 5. registration key
///
/// `auth` is the caller's immutable snapshot, so a client derived with a
/// different scheme never affects headers resolved here.
pub fn resolve(auth: &AuthConfig, overrides: &HeaderMap) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();

    if !overrides.keys().any(|name| is_credential_header(name.as_str())) {
        insert_scheme_headers(auth, &mut headers)?;
    }

    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

fn insert_scheme_headers(auth: &AuthConfig, headers: &mut HeaderMap) -> Result<(), ClientError> {
    match auth {
        AuthConfig::None => {}
        AuthConfig::ServerIdentity {
            server_uuid,
            server_secret,
        } => {
            insert_secret(headers, HeaderName::from_static(SERVER_UUID_HEADER), server_uuid)?;
            insert_secret(
                headers,
                HeaderName::from_static(SERVER_SECRET_HEADER),
                server_secret.expose(),
            )?;
        }
        AuthConfig::ApiKey { key, secret } => {
            insert_secret(headers, HeaderName::from_static(ACCESS_KEY_HEADER), key.expose())?;
            insert_secret(
                headers,
                HeaderName::from_static(ACCESS_SECRET_HEADER),
                secret.expose(),
            )?;
        }
        AuthConfig::Token { token } => {
            insert_secret(headers, AUTHORIZATION, &format!("Bearer {}", token.expose()))?;
        }
        AuthConfig::RegistrationKey { key } => {
            insert_secret(
                headers,
                HeaderName::from_static(REGISTRATION_KEY_HEADER),
                key.expose(),
            )?;
        }
    }
    Ok(())
}

fn insert_secret(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), ClientError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        // The value itself must not end up in the error message.
        ClientError::invalid_request(format!("credential for header '{name}' is not a valid header value"))
    })?;
    value.set_sensitive(true);
    headers.insert(name, value);
    Ok(())
}

/// `name: value` listing with every credential or sensitive value masked.
pub fn redacted_listing(headers: &HeaderMap) -> String {
    let mut entries: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() || is_credential_header(name.as_str()) {
                REDACTED_MASK
            } else {
                value.to_str().unwrap_or("<non-ascii>")
            };
            format!("{name}: {shown}")
        })
        .collect();
    entries.sort();
    entries.join(", ")
}
