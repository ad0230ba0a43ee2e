//! Stream registry for session state and pub/sub routing
//!
//! The registry owns every named session and routes producer lines
//! and chat to subscribers. It uses `tokio::sync::broadcast` for
//! efficient fan-out to multiple viewers.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<StreamRegistry>
//!                 ┌───────────────────────────────┐
//!                 │ streams: HashMap<Name,        │
//!                 │   StreamEntry {               │
//!                 │     token, active,            │
//!                 │     lines, chat,              │
//!                 │     tx: broadcast::Tx,        │
//!                 │   }                           │
//!                 │ >                             │
//!                 │ limiter / presence / bans     │
//!                 │ stats / activity              │
//!                 └──────────────┬────────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        │                       │                       │
//!        ▼                       ▼                       ▼
//!   [Producer]              [Viewer]                [Viewer]
//!   send(token, text)       events.recv()           events.recv()
//!        │                       │                       │
//!        └──► registry.send() ──► StreamEvent ──► transport
//! ```
//!
//! # Snapshot-then-live
//!
//! A new subscriber gets the recent line history and chat log plus a
//! broadcast receiver, both obtained under the same entry lock that
//! publishers hold to publish. Nothing published after the snapshot
//! was captured can be missed, and nothing in the snapshot is
//! delivered twice as a live event.

pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod history;
pub mod store;
pub mod token;

pub use config::RegistryConfig;
pub use entry::{SessionSummary, Snapshot, StreamEntry};
pub use error::RegistryError;
pub use event::{Line, LineKind, SendOutcome, StreamEvent};
pub use history::LineLog;
pub use store::{StreamInfo, StreamRegistry, Subscription};
pub use token::StreamToken;
