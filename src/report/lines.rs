use std::time::Duration;

use tokio::time::Instant;

use super::stats::compute_report_stats;
use crate::metrics::MetricsSnapshot;

const PERCENT_DIVISOR: u64 = 100;
const SECS_PER_MIN: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;

const HEADER: &str = "--- Traffic Generation Statistics ---";
const FOOTER: &str = "----------------------------------------";

/// `3725s` -> `1h 2m 5s`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MIN;
    let seconds = secs % SECS_PER_MIN;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

fn fixed2(value_x100: u64) -> String {
    format!(
        "{}.{:02}",
        value_x100 / PERCENT_DIVISOR,
        value_x100 % PERCENT_DIVISOR
    )
}

#[must_use]
pub fn report_lines(snapshot: &MetricsSnapshot, now: Instant) -> Vec<String> {
    let stats = compute_report_stats(snapshot, now);
    let mut lines = Vec::new();
    lines.push(HEADER.to_owned());
    lines.push(format!("Total requests: {}", stats.total));
    lines.push(format!("Successful: {}", stats.success));
    lines.push(format!("Failed: {}", stats.failed));
    lines.push(format!(
        "Success rate: {}%",
        fixed2(stats.success_rate_x100)
    ));
    lines.push(format!("Time elapsed: {}", format_elapsed(stats.elapsed)));
    lines.push(format!(
        "Average rate: {} requests/second",
        fixed2(stats.avg_rps_x100)
    ));
    lines.push(String::new());
    lines.push("Detailed Metrics:".to_owned());
    for (method, counts) in snapshot.per_method.iter() {
        lines.push(format!(
            "{} Requests: success={} failed={}",
            method, counts.success, counts.failed
        ));
    }
    lines.push(FOOTER.to_owned());
    lines
}
