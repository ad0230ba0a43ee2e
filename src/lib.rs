//! Live text stream session and real-time fan-out engine
//!
//! Many independent producers broadcast short text lines under a
//! claimed name; many viewers subscribe to a name's live feed plus an
//! attached chat. This crate is the in-memory core: the session
//! registry, the multi-tier rate limiters in front of it, viewer
//! presence, publish/subscribe fan-out with atomic snapshot-then-live
//! delivery, the bounded chat log, moderation (bans and forced
//! offline), day-scoped stats, and the background sweep that ages
//! idle sessions out.
//!
//! All state is volatile: a restart discards sessions, tokens, chat,
//! bans, stats, and the activity log. Transport, rendering, and admin
//! authentication live outside this crate.
//!
//! # Example
//!
//! ```no_run
//! use linecast_rs::{ConnId, SendOutcome, StreamRegistry};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = std::sync::Arc::new(StreamRegistry::new());
//! let _sweeper = registry.spawn_sweep_task();
//!
//! // First send for an unclaimed name mints the session token
//! let token = match registry.send("Nova1", None, "claim", "log", "203.0.113.7").await? {
//!     SendOutcome::Created { token } => token,
//!     SendOutcome::Accepted => unreachable!("name was unclaimed"),
//! };
//!
//! registry.send("Nova1", Some(token.as_str()), "hello", "log", "203.0.113.7").await?;
//!
//! // A viewer gets the history snapshot, then live events
//! let mut sub = registry.subscribe("Nova1", ConnId::new(1)).await?;
//! println!("history: {} lines", sub.snapshot.lines.len());
//! while let Ok(event) = sub.events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod limiter;
pub mod moderation;
pub mod presence;
pub mod registry;
pub mod stats;

pub use chat::{ChatLog, ChatMessage};
pub use limiter::{RateLimiter, RateRule};
pub use moderation::{ActivityEntry, BanSet};
pub use presence::{ConnId, PresenceTracker};
pub use registry::{
    Line, LineKind, RegistryConfig, RegistryError, SendOutcome, SessionSummary, Snapshot,
    StreamEvent, StreamInfo, StreamRegistry, StreamToken, Subscription,
};
pub use stats::StatsSnapshot;
