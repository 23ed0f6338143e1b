//! Monotonic time source for timeout checks.

use std::time::Instant;

/// Monotonic microsecond clock.
///
/// The engine never waits on a timer; it only compares `now_micros` against
/// a stored activity timestamp when a channel gets its turn. Tests inject a
/// manually advanced clock to drive timeout recovery deterministically.
pub trait Clock: Send + Sync {
    /// Current monotonic time in microseconds.
    fn now_micros(&self) -> u64;
}

/// Default [`Clock`] backed by [`Instant`], anchored at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_micros(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now_micros();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.now_micros();
        assert!(b > a);
    }

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = testing::ManualClock::default();
        assert_eq!(clock.now_micros(), 0);
        clock.advance_micros(1_500);
        assert_eq!(clock.now_micros(), 1_500);
        assert_eq!(clock.now_micros(), 1_500);
    }
}
