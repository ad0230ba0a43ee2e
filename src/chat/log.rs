//! Bounded chat log
//!
//! FIFO ring: once at capacity, appending evicts the oldest message.
//! Lives inside a stream entry and relies on the entry's lock; it does
//! no locking of its own.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// One chat message as stored and fanned out
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Stable display name derived from the sender's connection
    pub pseudonym: String,
    /// Sanitized message text
    pub text: String,
    /// Wall-clock receive time
    pub at: DateTime<Utc>,
}

/// Bounded per-stream message log
#[derive(Debug)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    max: usize,
}

impl ChatLog {
    /// Create an empty log holding at most `max` messages
    pub fn new(max: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max.min(64)),
            max,
        }
    }

    /// Append a message, evicting the oldest if at capacity
    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() >= self.max {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Copy of the log, oldest first, for subscriber snapshots
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> ChatMessage {
        ChatMessage {
            pseudonym: "SwiftFox-a1b2".to_string(),
            text: text.to_string(),
            at: Utc::now(),
        }
    }

    #[test]
    fn test_push_and_snapshot_order() {
        let mut log = ChatLog::new(200);

        log.push(msg("first"));
        log.push(msg("second"));
        log.push(msg("third"));

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].text, "first");
        assert_eq!(snapshot[2].text, "third");
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut log = ChatLog::new(3);

        for i in 0..5 {
            log.push(msg(&format!("m{}", i)));
        }

        assert_eq!(log.len(), 3);
        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].text, "m2");
        assert_eq!(snapshot[2].text, "m4");
    }

    #[test]
    fn test_never_grows_past_bound() {
        let mut log = ChatLog::new(200);

        for i in 0..1000 {
            log.push(msg(&format!("m{}", i)));
        }

        assert_eq!(log.len(), 200);
        assert_eq!(log.snapshot()[0].text, "m800");
    }

    #[test]
    fn test_empty() {
        let log = ChatLog::new(200);
        assert!(log.is_empty());
        assert!(log.snapshot().is_empty());
    }
}
