//! Periodic and final statistics blocks.
mod lines;
mod stats;


use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::metrics::{MetricsAggregator, MetricsSnapshot};

pub use lines::{format_elapsed, report_lines};
pub use stats::{ReportStats, compute_report_stats};

/// Prints statistics when the interval has elapsed since the last report,
/// and once more on shutdown.
#[derive(Debug, Clone)]
pub struct Reporter {
    interval: Duration,
    metrics: Arc<MetricsAggregator>,
}

impl Reporter {
    #[must_use]
    pub const fn new(interval: Duration, metrics: Arc<MetricsAggregator>) -> Self {
        Self { interval, metrics }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.metrics.last_report_at()) >= self.interval
    }

    /// Prints a report and resets the interval when it is due. Returns the
    /// reported snapshot.
    pub fn report_if_due(&self, now: Instant) -> Option<MetricsSnapshot> {
        if !self.is_due(now) {
            return None;
        }
        let snapshot = self.metrics.snapshot();
        print_lines(&report_lines(&snapshot, now));
        self.metrics.mark_reported(now);
        Some(snapshot)
    }

    /// Prints a report unconditionally.
    pub fn report_final(&self) -> MetricsSnapshot {
        let now = Instant::now();
        let snapshot = self.metrics.snapshot();
        print_lines(&report_lines(&snapshot, now));
        self.metrics.mark_reported(now);
        snapshot
    }
}

fn print_lines(lines: &[String]) {
    println!();
    for line in lines {
        println!("{}", line);
    }
}
