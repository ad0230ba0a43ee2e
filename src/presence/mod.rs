//! Viewer presence tracking
//!
//! Tracks which connections are watching which stream, enforces the
//! per-stream viewer cap, and feeds the global concurrency counters
//! behind the peak-viewer stats.

pub mod tracker;

pub use tracker::{ConnId, PresenceTracker};
