//! Backoff configuration.

use super::exponential::ExponentialBackoff;
use crate::error::BackoffConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
const DEFAULT_MULTIPLIER: f64 = 2.0;
const DEFAULT_JITTER: f64 = 0.1;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Validated parameters for a backoff schedule.
///
/// A `BackoffConfig` can only be obtained through validation, so every value
/// in circulation satisfies:
///
/// - `max_delay >= base_delay`
/// - `jitter` is a fraction in `[0, 1]`
/// - `multiplier` is finite and `>= 1`
///
/// `max_retries == 0` means retry without limit.
///
/// # Examples
///
/// ```rust
/// use retrykit::BackoffConfig;
/// use std::time::Duration;
///
/// let config = BackoffConfig::builder()
///     .base_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(5))
///     .multiplier(1.5)
///     .jitter(0.2)
///     .max_retries(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_retries(), 5);
/// ```
///
/// Configs can also be read from any serde format, with delays in
/// milliseconds:
///
/// ```rust
/// use retrykit::BackoffConfig;
///
/// let config: BackoffConfig = toml::from_str(
///     "base_delay_ms = 250\nmax_delay_ms = 10000\nmax_retries = 0",
/// )
/// .unwrap();
/// assert_eq!(config.max_retries(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBackoffConfig", into = "RawBackoffConfig")]
pub struct BackoffConfig {
    base_delay: Duration,
    max_delay: Duration,
    jitter: f64,
    multiplier: f64,
    max_retries: u32,
}

impl BackoffConfig {
    /// Create a config with unlimited retries.
    ///
    /// A `multiplier` of 1 gives a fixed interval.
    ///
    /// # Errors
    ///
    /// Returns a [`BackoffConfigError`] if any parameter is out of range.
    pub fn new(
        base_delay: Duration,
        max_delay: Duration,
        jitter: f64,
        multiplier: f64,
    ) -> Result<Self, BackoffConfigError> {
        Self {
            base_delay,
            max_delay,
            jitter,
            multiplier,
            max_retries: 0,
        }
        .validate()
    }

    /// Create a new builder for configuring backoff.
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::default()
    }

    /// Load a config from environment variables named `{prefix}_*`.
    ///
    /// Recognized variables, each optional and falling back to the defaults:
    /// - `{prefix}_BASE_DELAY_MS` (u64)
    /// - `{prefix}_MAX_DELAY_MS` (u64)
    /// - `{prefix}_JITTER` (f64)
    /// - `{prefix}_MULTIPLIER` (f64)
    /// - `{prefix}_MAX_RETRIES` (u32)
    ///
    /// # Errors
    ///
    /// Returns [`BackoffConfigError::InvalidEnv`] if a variable is set but
    /// cannot be parsed, or any other variant if the resulting config is
    /// invalid.
    #[cfg(feature = "env")]
    pub fn from_env(prefix: &str) -> Result<Self, BackoffConfigError> {
        let mut builder = Self::builder();

        if let Some(ms) = env_value::<u64>(prefix, "BASE_DELAY_MS")? {
            builder = builder.base_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = env_value::<u64>(prefix, "MAX_DELAY_MS")? {
            builder = builder.max_delay(Duration::from_millis(ms));
        }
        if let Some(jitter) = env_value::<f64>(prefix, "JITTER")? {
            builder = builder.jitter(jitter);
        }
        if let Some(multiplier) = env_value::<f64>(prefix, "MULTIPLIER")? {
            builder = builder.multiplier(multiplier);
        }
        if let Some(max_retries) = env_value::<u32>(prefix, "MAX_RETRIES")? {
            builder = builder.max_retries(max_retries);
        }

        builder.build()
    }

    /// Start a fresh backoff session over this config.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(*self)
    }

    /// Delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Upper bound for the un-jittered delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Jitter fraction in `[0, 1]`.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Growth multiplier, `>= 1`.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Maximum number of retries after the first attempt. 0 is unlimited.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn validate(self) -> Result<Self, BackoffConfigError> {
        if self.max_delay < self.base_delay {
            return Err(BackoffConfigError::MaxDelayBelowBase {
                base: self.base_delay,
                max: self.max_delay,
            });
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(BackoffConfigError::InvalidJitter(self.jitter));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(BackoffConfigError::InvalidMultiplier(self.multiplier));
        }
        Ok(self)
    }
}

impl Default for BackoffConfig {
    /// Defaults:
    /// - `base_delay`: 100ms
    /// - `max_delay`: 60s
    /// - `multiplier`: 2.0 (doubles each time)
    /// - `jitter`: 0.1 (±10%)
    /// - `max_retries`: 3
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: DEFAULT_JITTER,
            multiplier: DEFAULT_MULTIPLIER,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Builder for [`BackoffConfig`].
///
/// Unset parameters take the [`BackoffConfig::default`] values, except that
/// an unset `max_delay` never falls below the chosen `base_delay`.
#[derive(Debug, Clone, Default)]
pub struct BackoffConfigBuilder {
    base_delay: Option<Duration>,
    max_delay: Option<Duration>,
    jitter: Option<f64>,
    multiplier: Option<f64>,
    max_retries: Option<u32>,
}

impl BackoffConfigBuilder {
    /// Set the delay before the first retry.
    ///
    /// Default: 100ms
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Set the cap for the un-jittered delay.
    ///
    /// Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter fraction. A jitter of 0.1 lets each delay vary by ±10%.
    ///
    /// Default: 0.1
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Set the growth multiplier. 1.0 keeps the delay constant.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the maximum number of retries. 0 retries without limit.
    ///
    /// Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Validate and build the config.
    ///
    /// # Errors
    ///
    /// Returns a [`BackoffConfigError`] if any parameter is out of range.
    pub fn build(self) -> Result<BackoffConfig, BackoffConfigError> {
        let base_delay = self.base_delay.unwrap_or(DEFAULT_BASE_DELAY);
        BackoffConfig {
            base_delay,
            max_delay: self
                .max_delay
                .unwrap_or_else(|| DEFAULT_MAX_DELAY.max(base_delay)),
            jitter: self.jitter.unwrap_or(DEFAULT_JITTER),
            multiplier: self.multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        }
        .validate()
    }
}

/// Wire form of [`BackoffConfig`], delays in milliseconds.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawBackoffConfig {
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter: f64,
    multiplier: f64,
    max_retries: u32,
}

impl Default for RawBackoffConfig {
    fn default() -> Self {
        BackoffConfig::default().into()
    }
}

impl TryFrom<RawBackoffConfig> for BackoffConfig {
    type Error = BackoffConfigError;

    fn try_from(raw: RawBackoffConfig) -> Result<Self, Self::Error> {
        Self {
            base_delay: Duration::from_millis(raw.base_delay_ms),
            max_delay: Duration::from_millis(raw.max_delay_ms),
            jitter: raw.jitter,
            multiplier: raw.multiplier,
            max_retries: raw.max_retries,
        }
        .validate()
    }
}

impl From<BackoffConfig> for RawBackoffConfig {
    fn from(config: BackoffConfig) -> Self {
        Self {
            base_delay_ms: millis(config.base_delay),
            max_delay_ms: millis(config.max_delay),
            jitter: config.jitter,
            multiplier: config.multiplier,
            max_retries: config.max_retries,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(feature = "env")]
fn env_value<T: std::str::FromStr>(
    prefix: &str,
    key: &str,
) -> Result<Option<T>, BackoffConfigError> {
    let var = format!("{prefix}_{key}");
    match std::env::var(&var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| BackoffConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = BackoffConfig::builder().build().unwrap();

        assert_eq!(config, BackoffConfig::default());
        assert_eq!(config.base_delay(), Duration::from_millis(100));
        assert_eq!(config.max_delay(), Duration::from_secs(60));
        assert_eq!(config.multiplier(), 2.0);
        assert_eq!(config.jitter(), 0.1);
        assert_eq!(config.max_retries(), 3);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = BackoffConfig::builder()
            .base_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(30))
            .multiplier(1.5)
            .jitter(0.2)
            .max_retries(5)
            .build()
            .unwrap();

        assert_eq!(config.base_delay(), Duration::from_millis(200));
        assert_eq!(config.max_delay(), Duration::from_secs(30));
        assert_eq!(config.multiplier(), 1.5);
        assert_eq!(config.jitter(), 0.2);
        assert_eq!(config.max_retries(), 5);
    }

    #[test]
    fn test_unset_max_delay_follows_large_base() {
        let config = BackoffConfig::builder()
            .base_delay(Duration::from_secs(120))
            .build()
            .unwrap();

        assert_eq!(config.max_delay(), Duration::from_secs(120));
    }

    #[test]
    fn test_new_is_unlimited() {
        let config = BackoffConfig::new(
            Duration::from_millis(100),
            Duration::from_millis(100),
            0.0,
            1.0,
        )
        .unwrap();

        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn test_max_below_base_rejected() {
        let err = BackoffConfig::new(Duration::from_secs(2), Duration::from_secs(1), 0.0, 2.0)
            .unwrap_err();

        assert_eq!(
            err,
            BackoffConfigError::MaxDelayBelowBase {
                base: Duration::from_secs(2),
                max: Duration::from_secs(1),
            }
        );
    }

    #[test]
    fn test_jitter_not_clamped() {
        for jitter in [-0.1, 1.5, f64::NAN] {
            let err = BackoffConfig::builder().jitter(jitter).build().unwrap_err();
            assert!(matches!(err, BackoffConfigError::InvalidJitter(_)));
        }

        // Both ends of the range are valid
        assert!(BackoffConfig::builder().jitter(0.0).build().is_ok());
        assert!(BackoffConfig::builder().jitter(1.0).build().is_ok());
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        for multiplier in [0.5, 0.0, f64::INFINITY, f64::NAN] {
            let err = BackoffConfig::builder()
                .multiplier(multiplier)
                .build()
                .unwrap_err();
            assert!(matches!(err, BackoffConfigError::InvalidMultiplier(_)));
        }
    }

    #[test]
    fn test_deserialize_toml() {
        let config: BackoffConfig = toml::from_str(
            r#"
            base_delay_ms = 250
            max_delay_ms = 4000
            jitter = 0.25
            multiplier = 3.0
            max_retries = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.base_delay(), Duration::from_millis(250));
        assert_eq!(config.max_delay(), Duration::from_secs(4));
        assert_eq!(config.jitter(), 0.25);
        assert_eq!(config.multiplier(), 3.0);
        assert_eq!(config.max_retries(), 7);
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: BackoffConfig = toml::from_str("max_retries = 0").unwrap();

        assert_eq!(config.base_delay(), Duration::from_millis(100));
        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn test_deserialize_validates() {
        let result: Result<BackoffConfig, _> =
            toml::from_str("base_delay_ms = 5000\nmax_delay_ms = 1000");
        let err = result.unwrap_err();

        assert!(err.to_string().contains("max delay"), "{err}");
    }

    #[test]
    fn test_serialize_roundtrip_through_toml() {
        let config = BackoffConfig::builder()
            .base_delay(Duration::from_millis(50))
            .max_retries(9)
            .build()
            .unwrap();

        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("base_delay_ms = 50"));
        assert_eq!(toml::from_str::<BackoffConfig>(&text).unwrap(), config);
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("RETRYKIT_TEST_BASE_DELAY_MS", Some("250")),
                ("RETRYKIT_TEST_MAX_DELAY_MS", Some("2000")),
                ("RETRYKIT_TEST_JITTER", Some("0")),
                ("RETRYKIT_TEST_MULTIPLIER", None),
                ("RETRYKIT_TEST_MAX_RETRIES", Some(" 0 ")),
            ],
            || {
                let config = BackoffConfig::from_env("RETRYKIT_TEST").unwrap();

                assert_eq!(config.base_delay(), Duration::from_millis(250));
                assert_eq!(config.max_delay(), Duration::from_secs(2));
                assert_eq!(config.jitter(), 0.0);
                assert_eq!(config.multiplier(), 2.0);
                assert_eq!(config.max_retries(), 0);
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env_invalid_value() {
        temp_env::with_var("RETRYKIT_BAD_MAX_RETRIES", Some("lots"), || {
            let err = BackoffConfig::from_env("RETRYKIT_BAD").unwrap_err();

            assert_eq!(
                err,
                BackoffConfigError::InvalidEnv {
                    var: "RETRYKIT_BAD_MAX_RETRIES".to_string(),
                    value: "lots".to_string(),
                }
            );
        });
    }
}
