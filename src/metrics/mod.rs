//! Thread-safe success/failure counters per method category.
mod aggregator;
mod types;


pub use aggregator::MetricsAggregator;
pub use types::{MethodBreakdown, MethodCounts, MetricsSnapshot};
