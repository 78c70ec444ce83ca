use std::error::Error;

/// A retry decision for a failure.
///
/// Attach one to an error with [`RetriableError::new`] to tell the retry
/// driver whether reattempting the operation can help.
///
/// # Examples
///
/// ```rust
/// use retrykit::Retriable;
///
/// assert!(Retriable::new(true).is_retriable());
/// assert!(!Retriable::NO.is_retriable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Retriable(bool);

impl Retriable {
    /// The failure may succeed if retried.
    pub const YES: Self = Self(true);

    /// The failure is terminal; retrying cannot help.
    pub const NO: Self = Self(false);

    /// Wrap a retry decision.
    pub const fn new(retriable: bool) -> Self {
        Self(retriable)
    }

    /// Whether the associated failure should be retried.
    pub const fn is_retriable(self) -> bool {
        self.0
    }
}

impl From<bool> for Retriable {
    fn from(retriable: bool) -> Self {
        Self(retriable)
    }
}

/// An error annotated with an explicit [`Retriable`] decision.
///
/// Operations that know a failure is permanent (bad credentials, invalid
/// input) return one of these with [`Retriable::NO`] so the driver stops
/// immediately. The wrapped cause stays available through [`cause`],
/// [`into_cause`] and [`Error::source`].
///
/// `Display` forwards to the cause so the wrapper reads like the failure it
/// annotates. Since `source()` returns that same cause, reporters that walk
/// the whole chain (anyhow's `{:#}`, tracing error chains) print the message
/// twice; report [`cause`] directly to avoid the repeat.
///
/// [`cause`]: RetriableError::cause
/// [`into_cause`]: RetriableError::into_cause
///
/// # Examples
///
/// ```rust
/// use retrykit::{Retriable, RetriableError};
///
/// let err = RetriableError::new(Retriable::NO, "authentication failed");
/// assert!(!err.is_retriable());
/// assert_eq!(err.to_string(), "authentication failed");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{cause}")]
pub struct RetriableError {
    retriable: Retriable,
    #[source]
    cause: Box<dyn Error + Send + Sync + 'static>,
}

impl RetriableError {
    /// Associate a failure with a retry decision.
    pub fn new(retriable: Retriable, cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            retriable,
            cause: cause.into(),
        }
    }

    /// Mark a failure as terminal.
    pub fn terminal(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::new(Retriable::NO, cause)
    }

    /// Mark a failure as transient.
    pub fn transient(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::new(Retriable::YES, cause)
    }

    /// Whether the wrapped failure should be retried.
    pub fn is_retriable(&self) -> bool {
        self.retriable.is_retriable()
    }

    /// The retry decision attached to this error.
    pub fn retriable(&self) -> Retriable {
        self.retriable
    }

    /// The original failure.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    /// Discard the annotation and return the original failure.
    pub fn into_cause(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.cause
    }
}

/// Decide whether a failure should be retried.
///
/// Walks `err` and its [`source`](Error::source) chain; the first
/// [`RetriableError`] found decides. Anything else is retriable, since most
/// failures worth retrying (timeouts, connection resets) carry no annotation.
///
/// Wrapper error types must expose a [`RetriableError`] through `source()` for
/// it to be seen. With thiserror that means `#[source]` or `#[from]`, not
/// `#[error(transparent)]`.
///
/// # Examples
///
/// ```rust
/// use retrykit::{RetriableError, is_retriable};
///
/// let plain = std::io::Error::other("connection reset");
/// assert!(is_retriable(&plain));
///
/// let terminal = RetriableError::terminal("bad request");
/// assert!(!is_retriable(&terminal));
/// ```
pub fn is_retriable(err: &(dyn Error + 'static)) -> bool {
    std::iter::successors(Some(err), |&e| e.source())
        .find_map(|e| e.downcast_ref::<RetriableError>())
        .is_none_or(RetriableError::is_retriable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum FetchError {
        #[error("fetch rejected")]
        Rejected(#[source] RetriableError),
        #[error("fetch timed out")]
        Timeout,
    }

    #[test]
    fn test_retriable_flag() {
        assert!(Retriable::new(true).is_retriable());
        assert!(!Retriable::new(false).is_retriable());
        assert_eq!(Retriable::from(false), Retriable::NO);
    }

    #[test]
    fn test_is_retriable_idempotent() {
        let err = RetriableError::new(Retriable::NO, "can't retry");
        for _ in 0..10 {
            assert!(!err.is_retriable());
        }
        assert_eq!(err.retriable(), Retriable::NO);
    }

    #[test]
    fn test_display_and_source_are_the_cause() {
        let err = RetriableError::transient(std::io::Error::other("connection reset"));

        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("connection reset"));
        assert!(err.cause().downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_into_cause_keeps_original_type() {
        let err = RetriableError::terminal(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "auth failed",
        ));

        let cause = err.into_cause();
        let io = cause.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_unannotated_errors_default_to_retriable() {
        assert!(is_retriable(&std::io::Error::other("timeout")));
        assert!(is_retriable(&FetchError::Timeout));
    }

    #[test]
    fn test_is_retriable_follows_source_chain() {
        let rejected = FetchError::Rejected(RetriableError::terminal("401 unauthorized"));
        assert!(!is_retriable(&rejected));

        let throttled = FetchError::Rejected(RetriableError::transient("429 too many requests"));
        assert!(is_retriable(&throttled));
    }

    #[test]
    fn test_outermost_annotation_wins() {
        let inner = RetriableError::terminal("permanent");
        let outer = RetriableError::transient(inner);
        assert!(is_retriable(&outer));
    }
}
