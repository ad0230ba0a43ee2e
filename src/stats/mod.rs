//! Day-scoped and all-time statistics

pub mod metrics;

pub use metrics::{StatsAggregator, StatsSnapshot};
