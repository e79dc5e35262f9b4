use crate::error::RepositoryError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};

/// Point in time after which a repository call is abandoned.
///
/// Every repository operation takes one. Dropping the timed-out future
/// cancels the in-flight store request. `Deadline::unbounded()` is the
/// explicit opt-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Some(Instant::now() + timeout))
    }

    pub fn unbounded() -> Self {
        Self(None)
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    pub async fn run<T, F>(self, operation: &'static str, future: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match self.0 {
            None => future.await,
            Some(at) => timeout_at(at, future).await.map_err(|_| {
                tracing::warn!(operation, "order store call hit its deadline");
                RepositoryError::DeadlineExceeded(operation)
            })?,
        }
    }
}
