use std::thread;
use std::time::Duration;

use rand::Rng;

/// Inclusive range of a randomized pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange::fixed(Duration::ZERO);

    pub const fn secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    pub const fn fixed(duration: Duration) -> Self {
        Self {
            min: duration,
            max: duration,
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Sleep for a random duration within `range`.
pub fn pause<R: Rng + ?Sized>(rng: &mut R, range: DelayRange) {
    let delay = range.pick(rng);
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

/// Delays applied while handling one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// After opening the post link.
    pub post_load: DelayRange,
    /// After the swipe that materializes lazily rendered controls.
    pub after_reveal_scroll: DelayRange,
    /// After opening the reactor list.
    pub list_open: DelayRange,
    /// Between scrolls of the reactor list.
    pub list_scroll: DelayRange,
    /// Budget for each element lookup.
    pub element_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            post_load: DelayRange::secs(3, 5),
            after_reveal_scroll: DelayRange::secs(1, 2),
            list_open: DelayRange::secs(3, 5),
            list_scroll: DelayRange::secs(1, 2),
            element_timeout: Duration::from_secs(10),
        }
    }
}

impl Timings {
    /// No pauses and a zero lookup budget.
    pub fn immediate() -> Self {
        Self {
            post_load: DelayRange::ZERO,
            after_reveal_scroll: DelayRange::ZERO,
            list_open: DelayRange::ZERO,
            list_scroll: DelayRange::ZERO,
            element_timeout: Duration::ZERO,
        }
    }
}
