//! Multi-tier fixed-window rate limiting
//!
//! A single generic counter table serves every tier: per-name sends,
//! per-origin connection attempts, per-origin stream creation, and the
//! per-connection chat cooldown. Callers pick the tier by passing a
//! scope string and a [`RateRule`].

pub mod fixed_window;

pub use fixed_window::{RateLimiter, RateRule};
