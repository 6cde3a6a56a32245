use crate::config::ClientConfig;

use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Attempt budget and backoff curve for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_attempts: config.max_attempts(),
            initial_delay: config.retry_initial_delay,
            max_delay: config.retry_max_delay,
        }
    }

    pub(crate) fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fresh delay schedule for one logical call.
    pub(crate) fn schedule(&self) -> RetrySchedule {
        // No jitter: delays never shrink from one retry to the next.
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_delay,
            randomization_factor: 0.0,
            multiplier: BACKOFF_MULTIPLIER,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();

        RetrySchedule {
            backoff,
            max_delay: self.max_delay,
        }
    }
}

pub(crate) struct RetrySchedule {
    backoff: ExponentialBackoff,
    max_delay: Duration,
}

impl RetrySchedule {
    pub(crate) fn next_delay(&mut self) -> Duration {
        self.backoff
            .next_backoff()
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Transport failures worth another attempt: connect/DNS errors, timeouts,
/// and I/O failures while sending the request or reading the body.
pub(crate) fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}
