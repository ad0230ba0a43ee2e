//! Event types for stream fan-out
//!
//! This module defines the lines producers append and the events that
//! are broadcast to subscribers.

use chrono::{DateTime, Utc};

use crate::chat::ChatMessage;

use super::token::StreamToken;

/// Type tag of a streamed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Plain output
    Log,
    /// Tool invocation
    Tool,
    /// Reasoning trace
    Thought,
}

impl LineKind {
    /// Wire name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            LineKind::Log => "log",
            LineKind::Tool => "tool",
            LineKind::Thought => "thought",
        }
    }

    /// Parse a wire name; anything unrecognized is rejected
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "log" => Some(LineKind::Log),
            "tool" => Some(LineKind::Tool),
            "thought" => Some(LineKind::Thought),
            _ => None,
        }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of streamed text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Wall-clock receive time
    pub at: DateTime<Utc>,
    /// Sanitized text
    pub text: String,
    /// Type tag
    pub kind: LineKind,
}

/// An event broadcast to a stream's subscribers
///
/// Delivered in strict per-stream publish order. Cheap enough to clone
/// per receiver: payloads are short validated strings.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A new line was appended
    Line(Line),
    /// A chat message was posted
    Chat(ChatMessage),
    /// The viewer count changed
    ViewerCount(usize),
    /// The stream went offline (timeout, admin end, or ban)
    Offline,
}

/// Result of a successful send
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// First send for an unclaimed name: the session was created and
    /// this token authorizes all future sends
    Created {
        /// Fresh bearer credential for the new session
        token: StreamToken,
    },
    /// Line appended to an existing session
    Accepted,
}
