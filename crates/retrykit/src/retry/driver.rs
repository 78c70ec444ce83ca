//! The retry loop.

use super::strategy::BackoffStrategy;
use crate::error::is_retriable;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// Run `operation` until it succeeds, fails terminally, or the strategy is exhausted.
///
/// Each iteration invokes the operation once:
///
/// - `Ok` is returned immediately.
/// - An error that [`is_retriable`] rejects is returned immediately, without
///   sleeping.
/// - A retriable error is returned if the strategy is exhausted; otherwise the
///   calling thread sleeps for [`next_delay`](BackoffStrategy::next_delay) and
///   the loop continues.
///
/// Exhaustion is not an error of its own: the caller receives the last error
/// the operation produced. Errors are never logged or swallowed.
///
/// The strategy is taken by value so each session starts from its own state;
/// pass `&mut strategy` to reuse one across sessions (calling
/// [`reset`](BackoffStrategy::reset) in between).
///
/// There is no timeout on the operation itself and the sleep cannot be
/// interrupted. To cancel, have the operation observe a signal and return
/// [`RetriableError::terminal`](crate::RetriableError::terminal).
///
/// # Examples
///
/// ```rust
/// use retrykit::{BackoffConfig, RetriableError, retry_with_backoff};
/// use std::time::Duration;
///
/// let config = BackoffConfig::new(Duration::from_millis(1), Duration::from_millis(1), 0.0, 1.0)?;
///
/// let mut remaining_failures = 2;
/// let value = retry_with_backoff(config.backoff(), || {
///     if remaining_failures > 0 {
///         remaining_failures -= 1;
///         return Err(RetriableError::transient("connection reset"));
///     }
///     Ok(42)
/// })?;
///
/// assert_eq!(value, 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn retry_with_backoff<S, F, T, E>(mut strategy: S, mut operation: F) -> Result<T, E>
where
    S: BackoffStrategy,
    F: FnMut() -> Result<T, E>,
    E: Error + 'static,
{
    loop {
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        match backoff_after(&mut strategy, &err) {
            Some(delay) => std::thread::sleep(delay),
            None => return Err(err),
        }
    }
}

/// Async counterpart of [`retry_with_backoff`].
///
/// Same loop and the same stopping rules, but waits with
/// [`tokio::time::sleep`] so the task yields instead of blocking its worker
/// thread. Dropping the returned future abandons the session, which makes
/// `tokio::time::timeout` or `tokio::select!` usable for cancellation.
///
/// # Examples
///
/// ```rust
/// use retrykit::{BackoffConfig, retry_with_backoff_async};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BackoffConfig::default();
///
/// let value = retry_with_backoff_async(config.backoff(), || async {
///     Ok::<_, std::io::Error>(42)
/// })
/// .await?;
///
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff_async<S, F, Fut, T, E>(
    mut strategy: S,
    mut operation: F,
) -> Result<T, E>
where
    S: BackoffStrategy,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        match backoff_after(&mut strategy, &err) {
            Some(delay) => tokio::time::sleep(delay).await,
            None => return Err(err),
        }
    }
}

/// The delay before the next attempt, or `None` if the session is over.
fn backoff_after<S: BackoffStrategy>(
    strategy: &mut S,
    err: &(dyn Error + 'static),
) -> Option<Duration> {
    if !is_retriable(err) {
        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = strategy.attempts(), "terminal failure, not retrying");
        return None;
    }
    if strategy.is_exhausted() {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempts = strategy.attempts(),
            max_retries = strategy.max_retries(),
            "retry budget exhausted"
        );
        return None;
    }

    let delay = strategy.next_delay();
    #[cfg(feature = "tracing")]
    tracing::debug!(
        attempt = strategy.attempts(),
        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        "operation failed, backing off"
    );
    Some(delay)
}
