use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use super::types::{MethodBreakdown, MethodCounts, MetricsSnapshot};
use crate::args::HttpMethod;

#[derive(Debug, Default)]
struct MethodCounters {
    success: AtomicU64,
    failed: AtomicU64,
}

impl MethodCounters {
    fn load(&self) -> MethodCounts {
        MethodCounts {
            success: self.success.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Process-lifetime counters shared by every in-flight request. Counters
/// only ever go up.
#[derive(Debug)]
pub struct MetricsAggregator {
    get: MethodCounters,
    post: MethodCounters,
    delete: MethodCounters,
    started_at: Instant,
    /// Milliseconds after `started_at` of the last periodic report.
    last_report_ms: AtomicU64,
}

impl MetricsAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    #[must_use]
    pub fn starting_at(started_at: Instant) -> Self {
        Self {
            get: MethodCounters::default(),
            post: MethodCounters::default(),
            delete: MethodCounters::default(),
            started_at,
            last_report_ms: AtomicU64::new(0),
        }
    }

    const fn counters(&self, method: HttpMethod) -> &MethodCounters {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Post => &self.post,
            HttpMethod::Delete => &self.delete,
        }
    }

    pub fn record_success(&self, method: HttpMethod) {
        self.counters(method).success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, method: HttpMethod) {
        self.counters(method).failed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            per_method: MethodBreakdown {
                get: self.get.load(),
                post: self.post.load(),
                delete: self.delete.load(),
            },
            started_at: self.started_at,
            last_report_at: self.last_report_at(),
        }
    }

    #[must_use]
    pub fn last_report_at(&self) -> Instant {
        let offset = Duration::from_millis(self.last_report_ms.load(Ordering::Relaxed));
        self.started_at.checked_add(offset).unwrap_or(self.started_at)
    }

    pub fn mark_reported(&self, at: Instant) {
        let offset = at.saturating_duration_since(self.started_at).as_millis();
        self.last_report_ms
            .store(u64::try_from(offset).unwrap_or(u64::MAX), Ordering::Relaxed);
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
