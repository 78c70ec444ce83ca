//! The backoff strategy abstraction.

use std::time::Duration;

/// A schedule of delays between retry attempts.
///
/// A strategy is a small state machine owned by one retry session: each call
/// to [`next_delay`](Self::next_delay) hands out the wait before the next
/// attempt and advances the state. Do not share one instance between
/// concurrent sessions; give each its own, or [`reset`](Self::reset) it
/// between sequential sessions.
///
/// `&mut S` is itself a strategy, so a session can borrow a strategy the
/// caller intends to reuse.
///
/// # Examples
///
/// ```rust
/// use retrykit::{BackoffConfig, BackoffStrategy};
/// use std::time::Duration;
///
/// let mut backoff = BackoffConfig::builder()
///     .base_delay(Duration::from_millis(100))
///     .jitter(0.0)
///     .max_retries(2)
///     .build()
///     .unwrap()
///     .backoff();
///
/// assert_eq!(backoff.next_delay(), Duration::from_millis(100));
/// assert_eq!(backoff.next_delay(), Duration::from_millis(200));
/// assert!(backoff.is_exhausted());
///
/// backoff.reset();
/// assert_eq!(backoff.attempts(), 0);
/// ```
pub trait BackoffStrategy {
    /// Return the delay to wait before the next attempt, then advance.
    fn next_delay(&mut self) -> Duration;

    /// Restore the initial state: attempt 0, delay back to the base.
    fn reset(&mut self);

    /// Number of delays handed out since creation or the last reset.
    fn attempts(&self) -> u32;

    /// The maximum number of retries after the initial attempt.
    ///
    /// If `max_retries() == 3`, the operation is attempted up to 4 times
    /// (1 initial + 3 retries). 0 means no limit.
    fn max_retries(&self) -> u32;

    /// Whether the retry budget is spent.
    ///
    /// Checked by the driver before asking for another delay; always `false`
    /// when [`max_retries`](Self::max_retries) is 0.
    fn is_exhausted(&self) -> bool {
        let max = self.max_retries();
        max != 0 && self.attempts() >= max
    }
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for &mut S {
    fn next_delay(&mut self) -> Duration {
        (**self).next_delay()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn attempts(&self) -> u32 {
        (**self).attempts()
    }

    fn max_retries(&self) -> u32 {
        (**self).max_retries()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}
