//! Client configuration: construction, TOML loading and environment loading.

mod duration_format;

use crate::auth::AuthConfig;
use crate::error::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use url::Url;

const CONFIG_DIR_NAME: &str = "monitor";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Retries used when `max_retries` is not set (4 attempts in total).
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

pub const ENV_BASE_URL: &str = "MONITOR_BASE_URL";
pub const ENV_MAX_RETRIES: &str = "MONITOR_MAX_RETRIES";
pub const ENV_TIMEOUT: &str = "MONITOR_TIMEOUT";
pub const ENV_DEBUG: &str = "MONITOR_DEBUG";

/// Everything needed to build a [`crate::Client`].
///
/// `max_retries` is tri-state: `None` means "use [`DEFAULT_MAX_RETRIES`]",
/// `Some(0)` means a single attempt, `Some(n)` means up to `n + 1` attempts.
///
/// Retries apply to every method, POST included. A transient failure after
/// the server already processed a write will replay it, so non-idempotent
/// endpoints get at-least-once delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub max_retries: Option<u32>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default, deserialize_with = "duration_format::optional")]
    pub timeout: Option<Duration>,

    #[serde(
        default = "default_retry_initial_delay",
        deserialize_with = "duration_format::required"
    )]
    pub retry_initial_delay: Duration,

    #[serde(
        default = "default_retry_max_delay",
        deserialize_with = "duration_format::required"
    )]
    pub retry_max_delay: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: AuthConfig::None,
            max_retries: None,
            debug: false,
            timeout: None,
            retry_initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
            retry_max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Explicit retry count; `0` disables retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn with_default_retries(mut self) -> Self {
        self.max_retries = None;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_retry_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_delay = initial;
        self.retry_max_delay = max;
        self
    }

    /// Total dispatches allowed for one logical call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries
            .unwrap_or(DEFAULT_MAX_RETRIES)
            .saturating_add(1)
    }

    /// Validate the configuration and return the parsed base URL.
    #[track_caller]
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let base_url = parse_base_url(&self.base_url)?;

        self.auth.validate()?;

        if self.retry_initial_delay > self.retry_max_delay {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "retry_initial_delay ({:?}) exceeds retry_max_delay ({:?})",
                    self.retry_initial_delay, self.retry_max_delay
                ),
            });
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: String::from("timeout must be greater than zero"),
            });
        }

        Ok(base_url)
    }

    /// `<config dir>/monitor/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load and validate a TOML config file.
    #[track_caller]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::ParseError { location, reason, .. } => ConfigError::ParseError {
                location,
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        info!("Loaded client config from {}", path.display());
        Ok(config)
    }

    /// Load from [`Self::default_path`].
    #[track_caller]
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path().ok_or_else(|| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: String::from("no config directory available on this platform"),
        })?;
        Self::load(&path)
    }

    #[track_caller]
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the process environment, reading a `.env` file first if present.
    ///
    /// See [`Self::from_lookup`] for the variables read.
    #[track_caller]
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {}", path.display()),
            Err(_) => debug!("No .env file found - using existing environment variables"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from `MONITOR_*` variables supplied by `lookup`.
    ///
    /// `MONITOR_BASE_URL` is required. `MONITOR_MAX_RETRIES` (integer),
    /// `MONITOR_TIMEOUT` (e.g. `"10s"`), `MONITOR_DEBUG` (`1`/`true`/`yes`)
    /// and the credential variables read by [`AuthConfig::from_lookup`] are
    /// optional.
    #[track_caller]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| ConfigError::EnvError {
            location: ErrorLocation::from(Location::caller()),
            variable: ENV_BASE_URL.to_string(),
            reason: String::from("not set"),
        })?;

        let mut config = ClientConfig::new(base_url).with_auth(AuthConfig::from_lookup(&lookup)?);

        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            let retries = raw.trim().parse::<u32>().map_err(|e| ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                variable: ENV_MAX_RETRIES.to_string(),
                reason: e.to_string(),
            })?;
            config = config.with_max_retries(retries);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let timeout = humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                variable: ENV_TIMEOUT.to_string(),
                reason: e.to_string(),
            })?;
            config = config.with_timeout(timeout);
        }

        if let Some(raw) = lookup(ENV_DEBUG) {
            config = config.with_debug(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a base URL, accepting only `http` and `https` with a host.
#[track_caller]
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::InvalidUrl {
            location: ErrorLocation::from(Location::caller()),
            url: String::new(),
            reason: String::from("base URL is required"),
        });
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        location: ErrorLocation::from(Location::caller()),
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            location: ErrorLocation::from(Location::caller()),
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            location: ErrorLocation::from(Location::caller()),
            url: raw.to_string(),
            reason: String::from("missing host"),
        });
    }

    Ok(url)
}

fn default_retry_initial_delay() -> Duration {
    DEFAULT_RETRY_INITIAL_DELAY
}

fn default_retry_max_delay() -> Duration {
    DEFAULT_RETRY_MAX_DELAY
}
