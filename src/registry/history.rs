//! Line history buffer for late-joiner support
//!
//! When a new viewer subscribes to a live stream they receive the
//! recent history before any live event. This buffer holds that
//! history: a FIFO ring that evicts the oldest line once at capacity.
//! Lives inside a stream entry and relies on the entry's lock.

use std::collections::VecDeque;

use super::event::Line;

/// Bounded per-stream line history
#[derive(Debug)]
pub struct LineLog {
    lines: VecDeque<Line>,
    max: usize,
}

impl LineLog {
    /// Create an empty log holding at most `max` lines
    pub fn new(max: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max.min(64)),
            max,
        }
    }

    /// Append a line, evicting the oldest if at capacity
    pub fn push(&mut self, line: Line) {
        if self.lines.len() >= self.max {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Copy of the history, oldest first, for subscriber snapshots
    pub fn snapshot(&self) -> Vec<Line> {
        self.lines.iter().cloned().collect()
    }

    /// Number of stored lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::registry::event::LineKind;

    use super::*;

    fn line(text: &str) -> Line {
        Line {
            at: Utc::now(),
            text: text.to_string(),
            kind: LineKind::Log,
        }
    }

    #[test]
    fn test_push_and_snapshot_order() {
        let mut log = LineLog::new(500);

        log.push(line("first"));
        log.push(line("second"));

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "first");
        assert_eq!(snapshot[1].text, "second");
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut log = LineLog::new(3);

        for i in 0..5 {
            log.push(line(&format!("l{}", i)));
        }

        assert_eq!(log.len(), 3);
        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].text, "l2");
        assert_eq!(snapshot[2].text, "l4");
    }

    #[test]
    fn test_never_grows_past_bound() {
        let mut log = LineLog::new(500);

        for i in 0..2000 {
            log.push(line(&format!("l{}", i)));
        }

        assert_eq!(log.len(), 500);
        assert_eq!(log.snapshot()[0].text, "l1500");
        assert_eq!(log.snapshot()[499].text, "l1999");
    }

    #[test]
    fn test_empty() {
        let log = LineLog::new(500);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
