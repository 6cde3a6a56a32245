//! Credential schemes and how they map onto request headers.
//!
//! # Security
//! - Secret values live in [`RedactedSecret`] (redacted Debug, zeroized on drop)
//! - Header values are marked sensitive before they reach reqwest
//! - Debug logging only ever prints header names with a fixed mask

pub mod resolver;

use crate::error::ConfigError;

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;

use serde::Deserialize;

pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const ACCESS_KEY_HEADER: &str = "access-key";
pub const ACCESS_SECRET_HEADER: &str = "access-secret";
pub const SERVER_UUID_HEADER: &str = "x-server-uuid";
pub const SERVER_SECRET_HEADER: &str = "x-server-secret";
pub const REGISTRATION_KEY_HEADER: &str = "x-registration-key";

/// Every header any credential scheme may write.
pub const CREDENTIAL_HEADERS: [&str; 6] = [
    AUTHORIZATION_HEADER,
    ACCESS_KEY_HEADER,
    ACCESS_SECRET_HEADER,
    SERVER_UUID_HEADER,
    SERVER_SECRET_HEADER,
    REGISTRATION_KEY_HEADER,
];

pub const ENV_TOKEN: &str = "MONITOR_TOKEN";
pub const ENV_API_KEY: &str = "MONITOR_API_KEY";
pub const ENV_API_SECRET: &str = "MONITOR_API_SECRET";
pub const ENV_SERVER_UUID: &str = "MONITOR_SERVER_UUID";
pub const ENV_SERVER_SECRET: &str = "MONITOR_SERVER_SECRET";
pub const ENV_REGISTRATION_KEY: &str = "MONITOR_REGISTRATION_KEY";

/// The single active credential scheme of a client.
///
/// Exactly one variant is active; schemes are never combined.
///
/// In TOML:
/// ```toml
/// [auth]
/// scheme = "api_key"
/// key = "..."
/// secret = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    None,
    /// `Authorization: Bearer <token>`.
    Token { token: RedactedSecret },
    /// `Access-Key` + `Access-Secret`.
    ApiKey {
        key: RedactedSecret,
        secret: RedactedSecret,
    },
    /// Agent identity: `X-Server-UUID` + `X-Server-Secret`.
    ServerIdentity {
        server_uuid: String,
        server_secret: RedactedSecret,
    },
    /// One-time key for a server's self-registration call.
    RegistrationKey { key: RedactedSecret },
}

impl AuthConfig {
    pub fn token(token: impl Into<String>) -> Self {
        AuthConfig::Token {
            token: RedactedSecret::new(token),
        }
    }

    pub fn api_key(key: impl Into<String>, secret: impl Into<String>) -> Self {
        AuthConfig::ApiKey {
            key: RedactedSecret::new(key),
            secret: RedactedSecret::new(secret),
        }
    }

    pub fn server_identity(server_uuid: impl Into<String>, server_secret: impl Into<String>) -> Self {
        AuthConfig::ServerIdentity {
            server_uuid: server_uuid.into(),
            server_secret: RedactedSecret::new(server_secret),
        }
    }

    pub fn registration_key(key: impl Into<String>) -> Self {
        AuthConfig::RegistrationKey {
            key: RedactedSecret::new(key),
        }
    }

    /// Scheme name, safe to log.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Token { .. } => "token",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::ServerIdentity { .. } => "server_identity",
            AuthConfig::RegistrationKey { .. } => "registration_key",
        }
    }

    /// Pick the scheme from variables provided by `lookup`.
    ///
    /// When several schemes are present the highest one wins: server
    /// identity, then API key pair, then bearer token, then registration key.
    /// Half of a pair without the other half is an error rather than a
    /// silent fall-through to a lower scheme.
    #[track_caller]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        match (get(ENV_SERVER_UUID), get(ENV_SERVER_SECRET)) {
            (Some(uuid), Some(secret)) => return Ok(AuthConfig::server_identity(uuid, secret)),
            (Some(_), None) => return Err(half_pair(ENV_SERVER_UUID, ENV_SERVER_SECRET)),
            (None, Some(_)) => return Err(half_pair(ENV_SERVER_SECRET, ENV_SERVER_UUID)),
            (None, None) => {}
        }

        match (get(ENV_API_KEY), get(ENV_API_SECRET)) {
            (Some(key), Some(secret)) => return Ok(AuthConfig::api_key(key, secret)),
            (Some(_), None) => return Err(half_pair(ENV_API_KEY, ENV_API_SECRET)),
            (None, Some(_)) => return Err(half_pair(ENV_API_SECRET, ENV_API_KEY)),
            (None, None) => {}
        }

        if let Some(token) = get(ENV_TOKEN) {
            return Ok(AuthConfig::token(token));
        }

        if let Some(key) = get(ENV_REGISTRATION_KEY) {
            return Ok(AuthConfig::registration_key(key));
        }

        Ok(AuthConfig::None)
    }

    /// Reject blank credential parts.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AuthConfig::None => {}
            AuthConfig::Token { token } => {
                RedactedSecret::try_new(token.expose(), "token")?;
            }
            AuthConfig::ApiKey { key, secret } => {
                RedactedSecret::try_new(key.expose(), "API key")?;
                RedactedSecret::try_new(secret.expose(), "API secret")?;
            }
            AuthConfig::ServerIdentity {
                server_uuid,
                server_secret,
            } => {
                RedactedSecret::try_new(server_uuid.as_str(), "server UUID")?;
                RedactedSecret::try_new(server_secret.expose(), "server secret")?;
            }
            AuthConfig::RegistrationKey { key } => {
                RedactedSecret::try_new(key.expose(), "registration key")?;
            }
        }
        Ok(())
    }
}

/// Whether `name` is one of the headers a credential scheme writes.
pub fn is_credential_header(name: &str) -> bool {
    CREDENTIAL_HEADERS
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

#[track_caller]
fn half_pair(present: &str, missing: &str) -> ConfigError {
    ConfigError::EnvError {
        location: ErrorLocation::from(Location::caller()),
        variable: missing.to_string(),
        reason: format!("{present} is set but {missing} is missing"),
    }
}
