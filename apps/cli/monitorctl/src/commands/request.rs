//! `monitorctl request`: one raw call through the engine.

use crate::error::CliError;

use common::ErrorLocation;

use monitor_client::{CallContext, Client, PaginatedResponse, Request, StandardResponse};

use std::panic::Location;

use clap::Args;
use log::info;
use serde_json::Value;

#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// GET, POST, PUT, PATCH or DELETE
    pub method: String,

    /// Path relative to the base URL, e.g. `/v1/probes`
    pub path: String,

    /// Query parameter as `key=value` (repeatable)
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Extra header as `Name: value` (repeatable). A credential header
    /// replaces the configured credentials for this call.
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Decode as a paginated list envelope
    #[arg(long)]
    pub paginated: bool,
}

/// Run the call and return the envelope as pretty JSON.
pub async fn run(client: &Client, ctx: &CallContext, args: &RequestArgs) -> Result<String, CliError> {
    let request = build_request(args)?;

    let rendered = if args.paginated {
        let decoded = client
            .execute::<PaginatedResponse<Value>>(ctx, request)
            .await?;
        info!(
            "{} {} -> {} ({} item(s), page {}/{})",
            args.method,
            args.path,
            decoded.status,
            decoded.envelope.data.len(),
            decoded.envelope.meta.page,
            decoded.envelope.meta.total_pages
        );
        serde_json::to_string_pretty(&decoded.envelope)
    } else {
        let decoded = client
            .execute::<StandardResponse<Value>>(ctx, request)
            .await?;
        info!("{} {} -> {}", args.method, args.path, decoded.status);
        serde_json::to_string_pretty(&decoded.envelope)
    };

    rendered.map_err(|e| CliError::Output {
        message: format!("Failed to render response: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

pub fn build_request(args: &RequestArgs) -> Result<Request, CliError> {
    let mut request = Request::from_method_name(&args.method, args.path.as_str())?;

    for raw in &args.query {
        let (key, value) = parse_query_pair(raw)?;
        request = request.query(key, value);
    }

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        request = request.header(name, value);
    }

    if let Some(data) = &args.data {
        let body: Value = serde_json::from_str(data).map_err(|e| CliError::Argument {
            message: format!("--data is not valid JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        request = request.json(&body);
    }

    Ok(request)
}

/// `key=value`; the value may itself contain `=`.
#[track_caller]
pub fn parse_query_pair(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::Argument {
            message: format!("query parameter '{raw}' must look like key=value"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// `Name: value`.
#[track_caller]
pub fn parse_header(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        // The raw text may hold a credential, so it is not echoed back.
        _ => Err(CliError::Argument {
            message: String::from("header must look like 'Name: value'"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
