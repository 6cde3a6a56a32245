use crate::error::ClientError;

use models::ListOptions;

use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;

/// One logical API call, consumed by [`crate::Client::execute`].
///
/// ```ignore
/// let request = Request::post("/v1/probes")
///     .json(&new_probe)
///     .query("organization", "acme");
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<Result<Vec<u8>, serde_json::Error>>,
    headers: Vec<(String, String)>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Build from a method name (`GET`, `POST`, `PUT`, `PATCH`, `DELETE`, any case).
    #[track_caller]
    pub fn from_method_name(method: &str, path: impl Into<String>) -> Result<Self, ClientError> {
        let method = match method.to_ascii_uppercase().as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            other => {
                return Err(ClientError::invalid_request(format!(
                    "unsupported HTTP method '{other}'"
                )));
            }
        };
        Ok(Self::new(method, path))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    pub fn query_map<K, V, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn list_options(self, options: &ListOptions) -> Self {
        self.query_map(options.to_query())
    }

    /// JSON body. Serialization failures surface when the call is executed.
    pub fn json<T>(mut self, body: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Explicit header; replaces any header the client would set under the
    /// same name. Supplying a credential header suppresses the configured
    /// credential scheme for this call.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub(crate) fn into_parts(self) -> RequestParts {
        RequestParts {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            headers: self.headers,
        }
    }
}

pub(crate) struct RequestParts {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: BTreeMap<String, String>,
    pub(crate) body: Option<Result<Vec<u8>, serde_json::Error>>,
    pub(crate) headers: Vec<(String, String)>,
}
