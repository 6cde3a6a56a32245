use crate::error::ClientError;

use common::ErrorLocation;

use std::future::{Future, pending};
use std::panic::Location;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline scope for one or more calls.
///
/// Cloning shares the cancellation token, so cancelling any clone ends every
/// call running under it. A call checks the context before each dispatch and
/// races both the network wait and the retry backoff against it.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope calls to an existing token, e.g. one cancelled on shutdown.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Expire `timeout` from now. An earlier existing deadline is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// A child scope: cancelled with this one, cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the context is already cancelled or past its deadline.
    #[track_caller]
    pub fn check(&self) -> Result<(), ClientError> {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(ClientError::DeadlineExceeded {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Drive `future` until it completes or the context ends.
    ///
    /// When the context ends first, `future` is dropped, which aborts an
    /// in-flight request.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ClientError>
    where
        F: Future,
    {
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ClientError::Cancelled {
                location: ErrorLocation::from(Location::caller()),
            }),
            _ = expired => Err(ClientError::DeadlineExceeded {
                location: ErrorLocation::from(Location::caller()),
            }),
            output = future => Ok(output),
        }
    }
}
