//! Moderation surface
//!
//! A ban set that overlays all other stream state, plus the bounded
//! activity log backing the admin view. Privilege checks happen at the
//! caller; nothing here authenticates anyone.

pub mod audit;
pub mod bans;

pub use audit::{ActivityEntry, ActivityLog};
pub use bans::BanSet;
