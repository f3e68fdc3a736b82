//! Cycle scheduling and cooperative shutdown.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How often and how many times the daemon runs a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Pause between the end of one cycle and the start of the next
    pub interval: Duration,
    /// Stop after this many cycles; `None` runs until shutdown
    pub max_cycles: Option<u64>,
}

impl Schedule {
    /// Run forever at a fixed interval
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_cycles: None,
        }
    }

    /// Limit the number of cycles
    #[must_use]
    pub const fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Whether `completed` cycles exhaust the limit
    #[must_use]
    pub fn is_exhausted(&self, completed: u64) -> bool {
        self.max_cycles.is_some_and(|max| completed >= max)
    }
}

/// Cloneable stop signal shared between the daemon loop and whoever stops it.
///
/// Triggering wakes a pending [`Shutdown::wait_timeout`] immediately.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    /// Triggered flag plus the condition variable waiters park on
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    /// Create an untriggered signal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the flag; a poisoned flag is still a valid bool
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request shutdown and wake every waiter
    pub fn trigger(&self) {
        *self.flag() = true;
        self.inner.1.notify_all();
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.flag()
    }

    /// Sleep for up to `timeout`, returning early if shutdown is requested.
    ///
    /// Returns `true` if shutdown was requested.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.flag();
        let (guard, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}
