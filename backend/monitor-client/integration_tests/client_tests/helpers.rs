//! Shared setup for client integration tests: a mock platform server and
//! clients with short retry delays.

use monitor_client::{AuthConfig, Client, ClientConfig};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token-12345";

/// Config pointed at `server` with millisecond backoff.
pub fn fast_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
        .with_retry_delays(Duration::from_millis(10), Duration::from_millis(40))
}

pub fn client_with_retries(server: &MockServer, retries: Option<u32>) -> Client {
    let config = match retries {
        Some(n) => fast_config(server).with_max_retries(n),
        None => fast_config(server),
    };
    Client::new(config.with_auth(AuthConfig::token(TEST_TOKEN))).expect("Failed to build client")
}

pub fn success_envelope(data: Value) -> Value {
    json!({
        "status": "success",
        "message": "ok",
        "data": data,
    })
}

pub async fn received_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .len()
}
