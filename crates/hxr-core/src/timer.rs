//! Clock and blocking sleep used by the retry and polling loops.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of "now" plus a blocking delay. Waits are plain sleeps, not cancellable.
pub trait Timer: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock and `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimer;

impl Timer for SystemTimer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that advances only when slept on, recording every sleep.
///
/// Lets callers exercise retry and polling loops without real delays.
#[derive(Debug)]
pub struct ManualTimer {
    origin: Instant,
    state: Mutex<ManualState>,
}

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(ManualState::default()),
        }
    }

    /// Move the clock forward without recording a sleep (e.g. time spent in a request).
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.elapsed += by;
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sleeps
            .clone()
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_advances_on_sleep() {
        let t = ManualTimer::new();
        let start = t.now();
        t.sleep(Duration::from_millis(250));
        t.advance(Duration::from_millis(50));
        assert_eq!(t.now() - start, Duration::from_millis(300));
        assert_eq!(t.sleeps(), vec![Duration::from_millis(250)]);
    }
}
