use std::time::Duration;

use tokio::time::Instant;

use crate::metrics::MetricsSnapshot;

/// Derived figures for one report. Rates are fixed-point with two decimals
/// (`x100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStats {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    pub success_rate_x100: u64,
    pub elapsed: Duration,
    pub avg_rps_x100: u64,
}

/// Zero requests give a 0.00% success rate; zero elapsed time gives a
/// 0.00 average rate.
#[must_use]
pub fn compute_report_stats(snapshot: &MetricsSnapshot, now: Instant) -> ReportStats {
    let total = snapshot.total_requests();
    let success = snapshot.total_success();
    let failed = snapshot.total_failed();
    let elapsed = snapshot.elapsed_at(now);
    let elapsed_ms = elapsed.as_millis();

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(success)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    let avg_rps_x100 = if total > 0 && elapsed_ms > 0 {
        let scaled = u128::from(total)
            .saturating_mul(100_000)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    } else {
        0
    };

    ReportStats {
        total,
        success,
        failed,
        success_rate_x100,
        elapsed,
        avg_rps_x100,
    }
}
