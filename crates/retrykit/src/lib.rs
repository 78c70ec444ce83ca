#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry fallible operations with backoff.
//!
//! This crate runs an operation repeatedly until it succeeds, providing:
//!
//! - **Backoff schedules** via the `BackoffStrategy` trait
//!   - Exponential growth capped at a maximum delay
//!   - Multiplicative jitter from an injectable random generator
//!   - Optional retry budget (0 = unlimited)
//! - **Retriability classification** via `RetriableError`
//!   - Unannotated errors are retried
//!   - Errors wrapped with `Retriable::NO` stop the loop immediately
//! - **Blocking and async drivers** via `retry_with_backoff` and
//!   `retry_with_backoff_async`
//! - **Small value helpers** in [`util`]
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use retrykit::prelude::*;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackoffConfig::builder()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(100))
//!     .build()?;
//!
//! let result = retry_with_backoff(config.backoff(), || {
//!     // An authentication failure will never fix itself
//!     Err::<(), _>(RetriableError::terminal("invalid credentials"))
//! });
//!
//! assert!(result.is_err());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod retry;
pub mod util;

pub use error::{BackoffConfigError, Retriable, RetriableError, is_retriable};
pub use retry::{
    BackoffConfig, BackoffConfigBuilder, BackoffStrategy, ExponentialBackoff, retry_with_backoff,
    retry_with_backoff_async,
};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use retrykit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Retriable, RetriableError, is_retriable};
    pub use crate::retry::{
        BackoffConfig, BackoffStrategy, ExponentialBackoff, retry_with_backoff,
        retry_with_backoff_async,
    };
}
