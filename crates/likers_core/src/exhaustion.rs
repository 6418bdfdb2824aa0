/// Consecutive scrolls without new entries after which a reactor list is
/// considered fully rendered.
pub const REACTOR_LIST_REPEAT_LIMIT: u32 = 2;

/// Decides, scroll after scroll, whether a lazily loaded list has been consumed.
///
/// Two independent counters drive it: scrolls that brought no new entries
/// (`repeat_count`, ends the list) and consecutive entries skipped by the
/// policy (`skip_count`, requests a fling over already-seen regions, or ends
/// the list when flinging is disabled).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListExhaustion {
    repeat_count: u32,
    repeat_limit: u32,
    skip_count: u32,
    skip_limit: u32,
    fling_threshold: u32,
    exhausted: bool,
}

impl ListExhaustion {
    pub fn new(repeat_limit: u32, skip_limit: u32, fling_threshold: u32) -> Self {
        Self {
            repeat_count: 0,
            repeat_limit,
            skip_count: 0,
            skip_limit,
            fling_threshold,
            exhausted: false,
        }
    }

    /// Detector for a reactor list with the given skip settings.
    pub fn for_reactor_list(skip_limit: u32, fling_threshold: u32) -> Self {
        Self::new(REACTOR_LIST_REPEAT_LIMIT, skip_limit, fling_threshold)
    }

    /// Records a finished scroll that revealed `new_items` unseen entries.
    ///
    /// Returns `true` only on the scroll that exhausts the list; later calls
    /// return `false` while [`is_exhausted`](Self::is_exhausted) stays set.
    pub fn record_scroll(&mut self, new_items: usize) -> bool {
        if new_items == 0 {
            self.repeat_count += 1;
        } else {
            self.repeat_count = 0;
        }
        if !self.exhausted && self.repeat_count >= self.repeat_limit {
            self.exhausted = true;
            return true;
        }
        false
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn notify_skipped(&mut self) {
        self.skip_count += 1;
    }

    pub fn notify_processed(&mut self) {
        self.skip_count = 0;
    }

    /// Returns `true` when enough entries were skipped in a row to warrant a
    /// fling, and starts counting skips again from zero.
    pub fn take_fling(&mut self) -> bool {
        if self.fling_threshold > 0 && self.skip_count >= self.skip_limit {
            self.skip_count = 0;
            return true;
        }
        false
    }

    /// With flinging disabled, a long enough run of skipped entries ends the list.
    pub fn is_skip_limit_reached(&self) -> bool {
        self.fling_threshold == 0 && self.skip_limit > 0 && self.skip_count >= self.skip_limit
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn skip_count(&self) -> u32 {
        self.skip_count
    }
}
