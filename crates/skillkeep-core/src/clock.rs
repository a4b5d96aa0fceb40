//! Timestamp source
//!
//! Snapshots are keyed by second-resolution local time. The clock is a
//! trait so tests can drive timestamps deterministically.

use std::cell::Cell;

use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Source of snapshot timestamps
pub trait Clock {
    /// Current time, truncated to whole seconds
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Clock that advances by a fixed step on every reading
///
/// A zero step returns the same instant forever, which reproduces
/// same-second snapshot collisions.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: Cell<NaiveDateTime>,
    step: Duration,
}

impl SteppingClock {
    /// Start at `start`, advancing by `step` after each reading
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Start at `start`, advancing one second per reading
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self::new(start, Duration::seconds(1))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 8)
            .and_then(|d| d.and_hms_opt(14, 12, 34))
            .unwrap()
    }

    #[test]
    fn test_system_clock_whole_seconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::starting_at(start());

        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, start());
        assert_eq!(second - first, Duration::seconds(1));
    }

    #[test]
    fn test_zero_step_repeats() {
        let clock = SteppingClock::new(start(), Duration::zero());
        assert_eq!(clock.now(), clock.now());
    }
}
