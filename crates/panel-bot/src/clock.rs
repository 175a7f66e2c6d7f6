//! Clock abstraction for prompt expiry and audit timestamps.
//!
//! - `SystemClock`: real `tokio::time` and local wall-clock time
//! - `MockClock` (tests): both readings advance only when told to

use chrono::NaiveDateTime;
use tokio::time::Instant;

pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant, used to expire pending input prompts.
    fn now(&self) -> Instant;

    /// Local wall-clock time, used for audit entries.
    fn local_now(&self) -> NaiveDateTime;
}

#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[cfg(test)]
pub use mock_clock::MockClock;
