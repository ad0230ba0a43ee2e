//! Admin activity log
//!
//! Bounded ring of lifecycle and moderation events, newest first.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// One logged action
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    /// When the action happened
    pub at: DateTime<Utc>,
    /// Human-readable description
    pub message: String,
}

/// Bounded, newest-first activity log
///
/// Sync leaf: the mutex guards short, non-awaiting sections only.
#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    max: usize,
}

impl ActivityLog {
    /// Create an empty log holding at most `max` entries
    pub fn new(max: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max)),
            max,
        }
    }

    /// Record an action
    pub fn record(&self, message: impl Into<String>) {
        let mut entries = self.entries.lock().expect("activity log mutex poisoned");
        entries.push_front(ActivityEntry {
            at: Utc::now(),
            message: message.into(),
        });
        entries.truncate(self.max);
    }

    /// Copy of the log, newest first
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .expect("activity log mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let log = ActivityLog::new(50);

        log.record("first");
        log.record("second");
        log.record("third");

        let recent = log.recent();
        assert_eq!(recent[0].message, "third");
        assert_eq!(recent[2].message, "first");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let log = ActivityLog::new(50);

        for i in 0..80 {
            log.record(format!("event {}", i));
        }

        let recent = log.recent();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].message, "event 79");
        assert_eq!(recent[49].message, "event 30");
    }
}
