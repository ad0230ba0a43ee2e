//! Stream entry and per-session state
//!
//! This module defines the per-stream state stored in the registry.
//! The entry owns the broadcast sender for its fan-out channel, so
//! snapshot capture and receiver registration can happen under one
//! entry lock with no window for lost events.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::chat::{ChatLog, ChatMessage};

use super::config::RegistryConfig;
use super::event::{Line, StreamEvent};
use super::history::LineLog;
use super::token::StreamToken;

/// Entry for a single stream in the registry
pub struct StreamEntry {
    /// Bearer credential authorizing sends
    pub token: StreamToken,

    /// Whether the stream is live (false = offline)
    pub active: bool,

    /// Bounded line history for late-joiner snapshots
    pub lines: LineLog,

    /// Bounded chat log
    pub chat: ChatLog,

    /// Wall-clock creation time, for display
    pub started_at: DateTime<Utc>,

    /// Monotonic time of the last producer send, for timeout math
    pub last_activity: Instant,

    /// Highest viewer count this stream has seen
    pub peak_viewers: usize,

    /// Total lines ever appended (not capped by the history bound)
    pub total_messages: u64,

    /// Broadcast sender for fan-out to subscribers
    pub(super) tx: broadcast::Sender<StreamEvent>,
}

impl StreamEntry {
    /// Create a new active entry with a fresh token
    pub(super) fn new(config: &RegistryConfig) -> Self {
        let (tx, _) = broadcast::channel(config.broadcast_capacity);

        Self {
            token: StreamToken::generate(),
            active: true,
            lines: LineLog::new(config.max_lines),
            chat: ChatLog::new(config.max_chat_messages),
            started_at: Utc::now(),
            last_activity: Instant::now(),
            peak_viewers: 0,
            total_messages: 0,
            tx,
        }
    }

    /// Record a producer send: append the line and refresh activity
    pub(super) fn append(&mut self, line: Line) {
        self.lines.push(line);
        self.total_messages += 1;
        self.last_activity = Instant::now();
    }

    /// Capture the snapshot delivered to a new subscriber before any
    /// live event
    pub(super) fn snapshot(&self, viewer_count: usize) -> Snapshot {
        Snapshot {
            active: self.active,
            lines: self.lines.snapshot(),
            chat: self.chat.snapshot(),
            viewer_count,
        }
    }

    /// Subscribe to this stream's broadcast channel
    pub(super) fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.tx.subscribe()
    }

    /// Send an event to all subscribers
    ///
    /// Returns the number of receivers, or 0 if there are none.
    pub(super) fn publish(&self, event: StreamEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

/// Recent-history payload delivered to a new subscriber before live
/// events
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Whether the stream was live at capture time
    pub active: bool,
    /// Line history, oldest first
    pub lines: Vec<Line>,
    /// Chat log, oldest first
    pub chat: Vec<ChatMessage>,
    /// Viewer count at capture time (including the new subscriber)
    pub viewer_count: usize,
}

/// Admin-facing summary of one session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Stream name
    pub name: String,
    /// Whether the stream is live
    pub active: bool,
    /// Whether the name is banned
    pub banned: bool,
    /// Current viewer count
    pub viewer_count: usize,
    /// Highest viewer count seen
    pub peak_viewers: usize,
    /// Total lines ever appended
    pub total_messages: u64,
    /// Wall-clock creation time
    pub started_at: DateTime<Utc>,
    /// Time since the last producer send
    pub idle: std::time::Duration,
}

#[cfg(test)]
mod tests {
    use crate::registry::event::LineKind;

    use super::*;

    fn entry() -> StreamEntry {
        StreamEntry::new(&RegistryConfig::default())
    }

    fn line(text: &str) -> Line {
        Line {
            at: Utc::now(),
            text: text.to_string(),
            kind: LineKind::Log,
        }
    }

    #[test]
    fn test_new_entry_is_active_with_token() {
        let entry = entry();

        assert!(entry.active);
        assert!(!entry.token.as_str().is_empty());
        assert!(entry.lines.is_empty());
        assert!(entry.chat.is_empty());
        assert_eq!(entry.total_messages, 0);
    }

    #[test]
    fn test_append_updates_counters_and_activity() {
        let mut entry = entry();
        let before = entry.last_activity;

        entry.append(line("hello"));

        assert_eq!(entry.total_messages, 1);
        assert_eq!(entry.lines.len(), 1);
        assert!(entry.last_activity >= before);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut entry = entry();
        entry.append(line("one"));
        entry.append(line("two"));

        let snapshot = entry.snapshot(3);

        assert!(snapshot.active);
        assert_eq!(snapshot.viewer_count, 3);
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.lines[0].text, "one");
        assert!(snapshot.chat.is_empty());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let mut entry = entry();
        let mut rx = entry.subscribe();

        let l = line("live");
        entry.append(l.clone());
        assert_eq!(entry.publish(StreamEvent::Line(l.clone())), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, StreamEvent::Line(l));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let entry = entry();
        assert_eq!(entry.publish(StreamEvent::Offline), 0);
    }
}
