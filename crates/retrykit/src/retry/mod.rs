//! Retry strategies and backoff implementations.
//!
//! This module provides the backoff abstraction, its jittered exponential
//! implementation, and the drivers that run a fallible operation against it.
//!
//! # Key Types
//!
//! - [`BackoffConfig`] - Validated backoff parameters
//! - [`BackoffStrategy`] - Core trait for delay schedules
//! - [`ExponentialBackoff`] - Exponential backoff with jitter
//! - [`retry_with_backoff`] / [`retry_with_backoff_async`] - The retry loop
//!
//! # Examples
//!
//! ```rust
//! use retrykit::retry::{BackoffConfig, retry_with_backoff};
//! use std::time::Duration;
//!
//! let config = BackoffConfig::builder()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(10))
//!     .build()?;
//!
//! let result = retry_with_backoff(config.backoff(), || {
//!     // Your operation here
//!     Ok::<_, std::io::Error>(42)
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod driver;
mod exponential;
mod strategy;

pub use config::{BackoffConfig, BackoffConfigBuilder};
pub use driver::{retry_with_backoff, retry_with_backoff_async};
pub use exponential::ExponentialBackoff;
pub use strategy::BackoffStrategy;
