//! Clock abstraction and cooperative cancellation
//!
//! The scheduler loop never sleeps on the wall clock directly: it asks a
//! [`Clock`] for the current time and for cancellable waits, so the run
//! cadence and shutdown behavior are testable with a manual clock and no
//! real delays.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};

/// Cooperative shutdown signal. Cloneable; all clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: Mutex<bool>,
    condvar: Condvar,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake any waiter
    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cancelled = true;
        self.inner.condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Block for up to `duration`, returning early if cancelled.
    /// Returns true when the token was cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let deadline = std::time::Instant::now() + duration;
        while !*cancelled {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timeout) = self
                .inner
                .condvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            cancelled = guard;
        }
        true
    }
}

/// Time source for the scheduler loop
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Wait for `duration` or until the token is cancelled.
    /// Returns true when cancelled.
    fn wait(&self, duration: Duration, token: &CancellationToken) -> bool;
}

/// Wall-clock implementation backed by the cancellation token's condvar
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn wait(&self, duration: Duration, token: &CancellationToken) -> bool {
        token.wait_timeout(duration)
    }
}

/// Deterministic clock for tests: `wait` advances time instantly instead of
/// blocking. Clones share the same timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn starting_at(start: DateTime<Local>) -> Self {
        ManualClock {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now = *now + chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn wait(&self, duration: Duration, token: &CancellationToken) -> bool {
        self.advance(duration);
        token.is_cancelled()
    }
}
