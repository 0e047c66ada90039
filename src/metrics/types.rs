use std::time::Duration;

use tokio::time::Instant;

use crate::args::HttpMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodCounts {
    pub success: u64,
    pub failed: u64,
}

impl MethodCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.success.saturating_add(self.failed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodBreakdown {
    pub get: MethodCounts,
    pub post: MethodCounts,
    pub delete: MethodCounts,
}

impl MethodBreakdown {
    #[must_use]
    pub const fn get(&self, method: HttpMethod) -> MethodCounts {
        match method {
            HttpMethod::Get => self.get,
            HttpMethod::Post => self.post,
            HttpMethod::Delete => self.delete,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, MethodCounts)> + '_ {
        HttpMethod::ALL
            .into_iter()
            .map(move |method| (method, self.get(method)))
    }
}

/// Point-in-time copy of the aggregate counters. Totals are derived from
/// the per-method counts so the two always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub per_method: MethodBreakdown,
    pub started_at: Instant,
    pub last_report_at: Instant,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn total_success(&self) -> u64 {
        self.per_method
            .iter()
            .fold(0u64, |sum, (_, counts)| sum.saturating_add(counts.success))
    }

    #[must_use]
    pub fn total_failed(&self) -> u64 {
        self.per_method
            .iter()
            .fold(0u64, |sum, (_, counts)| sum.saturating_add(counts.failed))
    }

    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.total_success().saturating_add(self.total_failed())
    }

    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}
