use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a [`BackoffConfig`](crate::BackoffConfig).
///
/// Invalid parameters are rejected before any attempt runs; they are never
/// clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackoffConfigError {
    /// `max_delay` is shorter than `base_delay`
    #[error("max delay ({max:?}) must be at least the base delay ({base:?})")]
    MaxDelayBelowBase {
        /// Configured base delay
        base: Duration,
        /// Configured max delay
        max: Duration,
    },

    /// Jitter fraction outside `[0, 1]` or not finite
    #[error("jitter must be a fraction in [0, 1], got {0}")]
    InvalidJitter(f64),

    /// Growth multiplier below 1 or not finite
    #[error("multiplier must be a finite number >= 1, got {0}")]
    InvalidMultiplier(f64),

    /// Environment variable present but unparsable
    #[error("{var} has an invalid value: '{value}'")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Raw value found
        value: String,
    },
}
