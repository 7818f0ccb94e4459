//! Wait deadlines
//!
//! `wait` takes a [`Timeout`] rather than a bare `Duration` so that "block
//! forever" is a distinct value instead of a magic duration.

use std::time::{Duration, Instant};

/// Default bound for `wait` when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// How long `wait` may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// Fail with a timeout error once this much time has elapsed
    After(Duration),
    /// Block until every key is present
    Never,
}

impl Timeout {
    /// Shorthand for `Timeout::After(Duration::from_millis(ms))`.
    pub fn from_millis(ms: u64) -> Self {
        Timeout::After(Duration::from_millis(ms))
    }

    /// Absolute deadline relative to `start`, or `None` for [`Timeout::Never`].
    ///
    /// Saturates to `None` if the deadline is not representable.
    pub fn deadline_from(&self, start: Instant) -> Option<Instant> {
        match self {
            Timeout::After(d) => start.checked_add(*d),
            Timeout::Never => None,
        }
    }

    /// The bound as a duration, `None` when unbounded.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Timeout::After(d) => Some(*d),
            Timeout::Never => None,
        }
    }

    /// Check if this timeout never expires.
    pub fn is_never(&self) -> bool {
        matches!(self, Timeout::Never)
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::After(DEFAULT_TIMEOUT)
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::After(d)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(d: Option<Duration>) -> Self {
        d.map_or(Timeout::Never, Timeout::After)
    }
}
