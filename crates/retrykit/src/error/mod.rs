//! Error types and retriability classification.
//!
//! # Key Types
//!
//! - [`Retriable`] - A retry decision attached to a failure
//! - [`RetriableError`] - Wraps any error with an explicit [`Retriable`] decision
//! - [`BackoffConfigError`] - Rejected backoff parameters
//!
//! Failures that carry no [`RetriableError`] anywhere in their source chain are
//! treated as retriable; see [`is_retriable`].

mod config;
mod retriable;

pub use config::BackoffConfigError;
pub use retriable::{Retriable, RetriableError, is_retriable};
