//! Command-line surface and config assembly.

use crate::commands::request::RequestArgs;
use crate::error::CliError;

use common::ErrorLocation;
use monitor_client::ClientConfig;
use monitor_client::config::ENV_BASE_URL;

use std::env;
use std::panic::Location;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};

#[derive(Debug, Parser)]
#[command(name = "monitorctl")]
#[command(version, about = "Issue calls against the monitoring platform API", long_about = None)]
pub struct Cli {
    /// TOML config file. Without it, `MONITOR_*` variables are used when
    /// `MONITOR_BASE_URL` is set (in the environment or the env file),
    /// otherwise the per-user config file.
    #[arg(short, long, env = "MONITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Env file to load instead of searching for `.env` from the working directory.
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Log request and response details to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Retries after the first attempt (0 disables retries).
    #[arg(long)]
    pub retries: Option<u32>,

    /// Per-attempt HTTP timeout, e.g. `10s` or `1m 30s`.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Overall deadline for the call, retries and backoff included.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub deadline: Option<Duration>,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a single API call and print the decoded envelope
    Request(RequestArgs),
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            crate::logger::DEFAULT_LEVEL
        }
    }

    /// Load the client config and apply command-line overrides on top.
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None if self.env_defines_base_url()? => {
                ClientConfig::from_lookup(|name| env::var(name).ok())?
            }
            None => ClientConfig::load_default()?,
        };
        let config = self.apply_overrides(config);
        config.validate()?;
        debug!(
            "Using {} with {} attempt(s) per call",
            config.base_url,
            config.max_attempts()
        );
        Ok(config)
    }

    /// Load the env file into the process environment, then check for
    /// `MONITOR_BASE_URL`. Variables already set are never overwritten.
    fn env_defines_base_url(&self) -> Result<bool, CliError> {
        match &self.env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| CliError::Argument {
                    message: format!("cannot load env file {}: {e}", path.display()),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                debug!("Loaded env file: {}", path.display());
            }
            None => match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded .env from: {}", path.display()),
                Err(_) => debug!("No .env file found - using existing environment variables"),
            },
        }
        Ok(env::var_os(ENV_BASE_URL).is_some())
    }

    pub fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if self.debug {
            config = config.with_debug(true);
        }
        if let Some(retries) = self.retries {
            config = config.with_max_retries(retries);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}
