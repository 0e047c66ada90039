use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("trafficgen/", env!("CARGO_PKG_VERSION"));

/// Placeholder target; real runs override it with `URL` or `--url`.
pub(super) const DEFAULT_BASE_URL: &str = "http://your-application-endpoint";
pub(super) const DEFAULT_CONCURRENT_REQUESTS: &str = "50";
pub(super) const DEFAULT_REPORT_INTERVAL_SECS: &str = "60";
pub(super) const DEFAULT_BATCH_DELAY: &str = "100ms";
pub(super) const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
pub(super) const DEFAULT_REDIRECT_LIMIT: &str = "10";

/// Timeout applied to endpoints that do not set their own.
pub(crate) const DEFAULT_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);
