//! Exponential backoff with jitter.

use super::config::BackoffConfig;
use super::strategy::BackoffStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Exponential backoff strategy with configurable jitter.
///
/// Delays between retries grow by `multiplier` after every call, capped at
/// `max_delay`. Each delay is then scaled by a random factor to keep callers
/// that failed together from retrying together.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed after first failure):
/// ```text
/// capped_delay = min(max_delay, base_delay * multiplier^n)
/// final_delay  = capped_delay * random(1 - jitter, 1 + jitter)
/// ```
///
/// With `jitter == 0` no random number is drawn and delays are exact.
///
/// # Randomness
///
/// Every instance owns its generator. [`ExponentialBackoff::new`] seeds a
/// [`StdRng`] from the OS; [`ExponentialBackoff::with_rng`] takes any
/// [`Rng`], e.g. a seeded one for reproducible schedules.
///
/// # Examples
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use retrykit::{BackoffConfig, BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder().jitter(0.5).build().unwrap();
/// let mut a = ExponentialBackoff::with_rng(config, StdRng::seed_from_u64(42));
/// let mut b = ExponentialBackoff::with_rng(config, StdRng::seed_from_u64(42));
///
/// assert_eq!(a.next_delay(), b.next_delay());
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - no allocations
/// - **CPU**: O(1) per delay - simple arithmetic + at most one random number
#[derive(Debug, Clone)]
pub struct ExponentialBackoff<R = StdRng> {
    config: BackoffConfig,
    current: Duration,
    attempts: u32,
    rng: R,
}

impl ExponentialBackoff {
    /// Create a backoff seeded from operating system entropy.
    pub fn new(config: BackoffConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> ExponentialBackoff<R> {
    /// Create a backoff drawing jitter from `rng`.
    pub fn with_rng(config: BackoffConfig, rng: R) -> Self {
        Self {
            current: config.base_delay(),
            config,
            attempts: 0,
            rng,
        }
    }

    /// The configuration this backoff was built from.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    fn jittered(&mut self, delay: Duration) -> Duration {
        let jitter = self.config.jitter();
        if jitter == 0.0 {
            return delay;
        }
        let factor = self.rng.gen_range((1.0 - jitter)..=(1.0 + jitter));
        scale(delay, factor).unwrap_or(Duration::MAX)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

impl<R: Rng> BackoffStrategy for ExponentialBackoff<R> {
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = grow(delay, self.config.multiplier(), self.config.max_delay());
        self.attempts = self.attempts.saturating_add(1);
        self.jittered(delay)
    }

    fn reset(&mut self) {
        self.current = self.config.base_delay();
        self.attempts = 0;
    }

    fn attempts(&self) -> u32 {
        self.attempts
    }

    fn max_retries(&self) -> u32 {
        self.config.max_retries()
    }
}

/// `min(cap, delay * factor)`.
fn grow(delay: Duration, factor: f64, cap: Duration) -> Duration {
    match scale(delay, factor) {
        Some(grown) if grown < cap => grown,
        _ => cap,
    }
}

/// `delay * factor`, or `None` if the product does not fit in a `Duration`.
///
/// Products below `u64::MAX` nanoseconds are computed in whole nanoseconds so
/// exact inputs stay exact; longer ones go through seconds.
fn scale(delay: Duration, factor: f64) -> Option<Duration> {
    let nanos = delay.as_nanos() as f64 * factor;
    if nanos < u64::MAX as f64 {
        Some(Duration::from_nanos(nanos as u64))
    } else {
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor).ok()
    }
}
