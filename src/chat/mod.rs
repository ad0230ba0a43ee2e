//! Per-stream chat
//!
//! Each stream carries a bounded chat log; messages are attributed to
//! a stable pseudonym derived one-way from the sender's connection id,
//! never to the connection itself.

pub mod log;
pub mod pseudonym;

pub use log::{ChatLog, ChatMessage};
pub use pseudonym::pseudonym;
