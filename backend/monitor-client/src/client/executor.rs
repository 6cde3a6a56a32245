//! One logical call: build, resolve credentials, dispatch, retry.
//!
//! ```text
//! Building -> Resolving-Auth -> Dispatching -> Awaiting-Response
//!     -> (Retry-Wait -> Dispatching)* -> handed back for decoding
//! ```
//!
//! The context is checked before every dispatch and raced against both the
//! network wait and the backoff sleep.

use crate::REQUEST_ID_HEADER;
use crate::auth::is_credential_header;
use crate::auth::resolver::{redacted_listing, resolve};
use crate::client::request::{Request, RequestParts};
use crate::client::retry::is_transient;
use crate::client::{CallContext, Client};
use crate::error::ClientError;

use common::HttpStatusCode;

use std::collections::BTreeMap;

use log::{debug, trace, warn};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio::time::sleep;
use url::Url;
use uuid::Uuid;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Terminal HTTP response of a call, before decoding or classification.
#[derive(Debug)]
pub struct RawResponse {
    pub status: HttpStatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub attempts: u32,
}

/// A request ready to be dispatched any number of times.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) request_id: String,
}

impl Client {
    /// Run the dispatch loop and return the terminal response.
    ///
    /// Any status is returned as-is once retries stop; a transport failure
    /// that outlives the attempt budget becomes [`ClientError::Transport`].
    pub async fn dispatch(&self, ctx: &CallContext, request: Request) -> Result<RawResponse, ClientError> {
        ctx.check()?;

        let prepared = self.prepare(request)?;
        let max_attempts = self.settings.retry.max_attempts();
        let mut schedule = self.settings.retry.schedule();

        if self.settings.debug {
            debug!(
                "{} {} [{}] headers: {}",
                prepared.method,
                prepared.url.path(),
                prepared.request_id,
                redacted_listing(&prepared.headers)
            );
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            ctx.check()?;

            trace!(
                "Dispatching {} {} [{}] attempt {attempt}/{max_attempts}",
                prepared.method, prepared.url, prepared.request_id
            );

            match ctx.run(self.send_once(&prepared)).await? {
                Ok(response) if response.status.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "{} {} [{}] returned {} on attempt {attempt}/{max_attempts}, retrying",
                        prepared.method,
                        prepared.url.path(),
                        prepared.request_id,
                        response.status
                    );
                }
                Ok(mut response) => {
                    response.attempts = attempt;
                    return Ok(response);
                }
                Err(error) if is_transient(&error) && attempt < max_attempts => {
                    warn!(
                        "{} {} [{}] failed on attempt {attempt}/{max_attempts}: {error}, retrying",
                        prepared.method,
                        prepared.url.path(),
                        prepared.request_id
                    );
                }
                Err(error) => return Err(ClientError::transport(error, attempt)),
            }

            let delay = schedule.next_delay();
            trace!("Backing off {delay:?} before attempt {}", attempt + 1);
            ctx.run(sleep(delay)).await?;
        }
    }

    /// Building and Resolving-Auth: everything that can fail without the network.
    pub(crate) fn prepare(&self, request: Request) -> Result<PreparedRequest, ClientError> {
        let RequestParts {
            method,
            path,
            query,
            body,
            headers: header_overrides,
        } = request.into_parts();

        self.auth.validate()?;

        let url = build_url(&self.settings.base_url, &path, &query)?;

        let body = body
            .transpose()
            .map_err(|e| ClientError::invalid_request(format!("failed to serialize request body: {e}")))?;

        let overrides = override_headers(&header_overrides)?;
        let request_id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        for (name, value) in resolve(&self.auth, &overrides)? {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            request_id,
        })
    }

    /// Dispatching and Awaiting-Response for a single attempt, body included,
    /// so a connection dropped mid-body counts as a transport failure.
    async fn send_once(&self, prepared: &PreparedRequest) -> Result<RawResponse, reqwest::Error> {
        let mut builder = self
            .http
            .request(prepared.method.clone(), prepared.url.clone())
            .headers(prepared.headers.clone());
        if let Some(body) = &prepared.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = HttpStatusCode(response.status().as_u16());
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
            attempts: 0,
        })
    }
}

/// Join `path` onto the base URL's path and append `query`.
///
/// The base path is kept: `https://host/api` + `/v1/probes` gives
/// `https://host/api/v1/probes`.
pub(crate) fn build_url(
    base: &Url,
    path: &str,
    query: &BTreeMap<String, String>,
) -> Result<Url, ClientError> {
    if path.contains(['?', '#']) {
        return Err(ClientError::invalid_request(format!(
            "path '{path}' must not contain a query or fragment; use Request::query"
        )));
    }

    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
}

fn override_headers(pairs: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ClientError::invalid_request(format!("invalid header name '{name}'")))?;
        let mut header_value = HeaderValue::from_str(value.trim())
            .map_err(|_| ClientError::invalid_request(format!("invalid value for header '{name}'")))?;
        if is_credential_header(header_name.as_str()) {
            header_value.set_sensitive(true);
        }
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
