//! The request execution engine.
//!
//! A [`Client`] owns the base URL, the retry policy and one credential
//! scheme, all immutable. Switching credentials derives a new client
//! (`with_token`, `with_api_key`, ...) that shares the connection pool but
//! never touches the original, so calls in flight on either are unaffected.

pub mod context;
pub mod executor;
pub mod request;
pub(crate) mod retry;

pub use context::CallContext;
pub use request::Request;

use crate::auth::AuthConfig;
use crate::classify::{classify, parse_retry_after};
use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::decode::{decode, decode_into};
use crate::error::{ClientError, ConfigError};
use crate::USER_AGENT;

use common::HttpStatusCode;
use models::{Envelope, PaginationMeta};
use executor::RawResponse;
use retry::RetryPolicy;

use std::sync::Arc;

use log::debug;
use reqwest::Client as HttpClient;
use url::Url;

#[derive(Debug)]
pub(crate) struct ClientSettings {
    pub(crate) base_url: Url,
    pub(crate) retry: RetryPolicy,
    pub(crate) debug: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    settings: Arc<ClientSettings>,
    auth: Arc<AuthConfig>,
}

/// A successfully decoded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<E> {
    pub envelope: E,
    /// Copy of the envelope's `meta` block for list calls.
    pub pagination: Option<PaginationMeta>,
    pub status: HttpStatusCode,
    /// Dispatches it took, including the successful one.
    pub attempts: u32,
}

impl Client {
    /// Build a client with its own connection pool.
    ///
    /// The base URL is parsed and the config validated here; a malformed URL
    /// never makes it to call time.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = HttpClient::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::from)?;

        Self::with_http_client(config, http)
    }

    /// Build a client on top of a caller-supplied reqwest client.
    ///
    /// `config.timeout` is not applied; the supplied client's own settings win.
    pub fn with_http_client(config: ClientConfig, http: HttpClient) -> Result<Self, ClientError> {
        let base_url = config.validate()?;

        if config.debug {
            debug!(
                "Client configured for {base_url} (auth: {}, max attempts: {})",
                config.auth.scheme_name(),
                config.max_attempts()
            );
        }

        Ok(Self {
            http,
            settings: Arc::new(ClientSettings {
                base_url,
                retry: RetryPolicy::from_config(&config),
                debug: config.debug,
            }),
            auth: Arc::new(config.auth),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn max_attempts(&self) -> u32 {
        self.settings.retry.max_attempts()
    }

    pub fn is_debug(&self) -> bool {
        self.settings.debug
    }

    /// A client identical to this one but authenticating with `auth`.
    ///
    /// Blank credentials are not rejected here; every call made through the
    /// derived client fails pre-flight with [`ClientError::Config`] instead.
    pub fn with_auth(&self, auth: AuthConfig) -> Self {
        Self {
            http: self.http.clone(),
            settings: Arc::clone(&self.settings),
            auth: Arc::new(auth),
        }
    }

    pub fn with_token(&self, token: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::token(token))
    }

    pub fn with_api_key(&self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::api_key(key, secret))
    }

    pub fn with_server_credentials(
        &self,
        server_uuid: impl Into<String>,
        server_secret: impl Into<String>,
    ) -> Self {
        self.with_auth(AuthConfig::server_identity(server_uuid, server_secret))
    }

    pub fn with_registration_key(&self, key: impl Into<String>) -> Self {
        self.with_auth(AuthConfig::registration_key(key))
    }

    /// Execute `request` and decode the body as envelope `E`.
    ///
    /// `E` picks the expected shape: `StandardResponse<T>` for single objects,
    /// `PaginatedResponse<T>` for lists. Transient failures (connection
    /// errors, timeouts, 5xx) are retried for every method, POST included, so
    /// a write may be delivered more than once.
    pub async fn execute<E>(&self, ctx: &CallContext, request: Request) -> Result<Decoded<E>, ClientError>
    where
        E: Envelope,
    {
        let (target, raw) = self.fetch(ctx, request).await?;
        let envelope: E = decode(&raw.body)?;
        self.log_envelope(&target, &raw, &envelope);

        Ok(Decoded {
            pagination: envelope.pagination().cloned(),
            envelope,
            status: raw.status,
            attempts: raw.attempts,
        })
    }

    /// Execute `request` and overwrite `destination` with the decoded envelope.
    ///
    /// Returns the pagination metadata, if the envelope shape carries one.
    /// On error `destination` is left untouched.
    pub async fn execute_into<E>(
        &self,
        ctx: &CallContext,
        request: Request,
        destination: &mut E,
    ) -> Result<Option<PaginationMeta>, ClientError>
    where
        E: Envelope,
    {
        let (target, raw) = self.fetch(ctx, request).await?;
        let pagination = decode_into(&raw.body, destination)?;
        self.log_envelope(&target, &raw, destination);
        Ok(pagination)
    }

    /// Dispatch and classify: only a 2xx response comes back as `Ok`.
    async fn fetch(&self, ctx: &CallContext, request: Request) -> Result<(String, RawResponse), ClientError> {
        let target = format!("{} {}", request.method(), request.path());

        let raw = self.dispatch(ctx, request).await?;

        if raw.status.is_success() {
            return Ok((target, raw));
        }

        let error = classify(raw.status, &raw.body, parse_retry_after(&raw.headers));
        if self.settings.debug {
            debug!(
                "{target} -> {} after {} attempt(s): {}",
                raw.status,
                raw.attempts,
                error.message()
            );
        }
        Err(error.into())
    }

    fn log_envelope<E>(&self, target: &str, raw: &RawResponse, envelope: &E)
    where
        E: Envelope,
    {
        if self.settings.debug {
            debug!(
                "{target} -> {} (status: '{}', message: '{}')",
                raw.status,
                envelope.status(),
                envelope.message()
            );
        }
    }
}
