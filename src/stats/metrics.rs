//! Statistics aggregator
//!
//! Day-scoped counters roll over when the calendar date changes, not
//! on an exact clock tick: the sweep passes in the current date and
//! the aggregator compares it against the date of the last reset, so
//! a delayed tick still triggers the roll.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

#[derive(Debug, Clone)]
struct GlobalStats {
    streams_today: u64,
    messages_today: u64,
    peak_concurrent_today: usize,
    peak_concurrent_all_time: usize,
    last_reset: NaiveDate,
}

/// Read-only copy of the counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Streams created since the last daily reset
    pub streams_today: u64,
    /// Lines appended since the last daily reset
    pub messages_today: u64,
    /// Peak concurrent viewers since the last daily reset
    pub peak_concurrent_today: usize,
    /// Peak concurrent viewers since process start
    pub peak_concurrent_all_time: usize,
    /// Date of the last daily reset
    pub last_reset: NaiveDate,
}

/// Process-wide counters, updated on session creation, message append,
/// and viewer-peak changes
///
/// Sync leaf: the mutex guards short, non-awaiting sections only.
#[derive(Debug)]
pub struct StatsAggregator {
    inner: Mutex<GlobalStats>,
}

impl StatsAggregator {
    /// Create an aggregator with all counters at zero
    pub fn new() -> Self {
        Self::starting_on(Utc::now().date_naive())
    }

    fn starting_on(date: NaiveDate) -> Self {
        Self {
            inner: Mutex::new(GlobalStats {
                streams_today: 0,
                messages_today: 0,
                peak_concurrent_today: 0,
                peak_concurrent_all_time: 0,
                last_reset: date,
            }),
        }
    }

    /// Count a newly created stream
    pub fn on_stream_created(&self) {
        self.inner.lock().expect("stats mutex poisoned").streams_today += 1;
    }

    /// Count an appended line
    pub fn on_message(&self) {
        self.inner.lock().expect("stats mutex poisoned").messages_today += 1;
    }

    /// Feed the current global concurrent-viewer total; raises the
    /// daily and all-time peaks when exceeded
    pub fn record_concurrent(&self, total: usize) {
        let mut stats = self.inner.lock().expect("stats mutex poisoned");
        if total > stats.peak_concurrent_today {
            stats.peak_concurrent_today = total;
        }
        if total > stats.peak_concurrent_all_time {
            stats.peak_concurrent_all_time = total;
        }
    }

    /// Zero the day-scoped counters if `today` differs from the date
    /// of the last reset; returns whether a roll happened
    pub fn roll_day_if_needed(&self, today: NaiveDate) -> bool {
        let mut stats = self.inner.lock().expect("stats mutex poisoned");
        if stats.last_reset == today {
            return false;
        }

        stats.streams_today = 0;
        stats.messages_today = 0;
        stats.peak_concurrent_today = 0;
        stats.last_reset = today;
        true
    }

    /// Current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        let stats = self.inner.lock().expect("stats mutex poisoned");
        StatsSnapshot {
            streams_today: stats.streams_today,
            messages_today: stats.messages_today,
            peak_concurrent_today: stats.peak_concurrent_today,
            peak_concurrent_all_time: stats.peak_concurrent_all_time,
            last_reset: stats.last_reset,
        }
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_counters_accumulate() {
        let stats = StatsAggregator::new();

        stats.on_stream_created();
        stats.on_message();
        stats.on_message();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.streams_today, 1);
        assert_eq!(snapshot.messages_today, 2);
    }

    #[test]
    fn test_peaks_only_rise() {
        let stats = StatsAggregator::new();

        stats.record_concurrent(3);
        stats.record_concurrent(7);
        stats.record_concurrent(5);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.peak_concurrent_today, 7);
        assert_eq!(snapshot.peak_concurrent_all_time, 7);
    }

    #[test]
    fn test_same_day_does_not_roll() {
        let stats = StatsAggregator::starting_on(date(2026, 8, 6));

        stats.on_stream_created();
        assert!(!stats.roll_day_if_needed(date(2026, 8, 6)));
        assert_eq!(stats.snapshot().streams_today, 1);
    }

    #[test]
    fn test_date_change_rolls_day_counters() {
        let stats = StatsAggregator::starting_on(date(2026, 8, 6));

        stats.on_stream_created();
        stats.on_message();
        stats.record_concurrent(12);

        assert!(stats.roll_day_if_needed(date(2026, 8, 7)));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.streams_today, 0);
        assert_eq!(snapshot.messages_today, 0);
        assert_eq!(snapshot.peak_concurrent_today, 0);
        assert_eq!(snapshot.last_reset, date(2026, 8, 7));

        // All-time peak survives the roll
        assert_eq!(snapshot.peak_concurrent_all_time, 12);
    }

    #[test]
    fn test_roll_fires_once_per_boundary() {
        let stats = StatsAggregator::starting_on(date(2026, 8, 6));

        assert!(stats.roll_day_if_needed(date(2026, 8, 7)));
        assert!(!stats.roll_day_if_needed(date(2026, 8, 7)));
    }

    #[test]
    fn test_roll_catches_skipped_days() {
        // A process asleep across several boundaries still rolls on
        // the next tick
        let stats = StatsAggregator::starting_on(date(2026, 8, 6));

        stats.on_message();
        assert!(stats.roll_day_if_needed(date(2026, 8, 9)));
        assert_eq!(stats.snapshot().messages_today, 0);
    }
}
