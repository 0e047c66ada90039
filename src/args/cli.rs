use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_DELAY, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REDIRECT_LIMIT, DEFAULT_REPORT_INTERVAL_SECS,
};
use super::parsers::{parse_duration_arg, parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Continuous synthetic traffic generator - weighted random HTTP workload, concurrent batches, and periodic throughput statistics."
)]
pub struct GeneratorArgs {
    /// Base URL of the target service
    #[arg(long, short, env = "URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Requests launched concurrently in each batch
    #[arg(
        long = "concurrent-requests",
        short = 'c',
        env = "CONCURRENT_REQUESTS",
        default_value = DEFAULT_CONCURRENT_REQUESTS,
        value_parser = parse_positive_usize
    )]
    pub concurrent_requests: PositiveUsize,

    /// Seconds between periodic statistics reports
    #[arg(
        long = "report-interval",
        short = 'r',
        env = "REPORT_INTERVAL",
        default_value = DEFAULT_REPORT_INTERVAL_SECS,
        value_parser = parse_positive_u64
    )]
    pub report_interval: PositiveU64,

    /// Pause between batches (supports ms/s/m/h)
    #[arg(
        long = "batch-delay",
        env = "BATCH_DELAY",
        default_value = DEFAULT_BATCH_DELAY,
        value_parser = parse_duration_arg
    )]
    pub batch_delay: Duration,

    /// TCP connect timeout (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        env = "CONNECT_TIMEOUT",
        default_value = DEFAULT_CONNECT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables redirects)
    #[arg(long = "redirect-limit", default_value = DEFAULT_REDIRECT_LIMIT)]
    pub redirect_limit: u32,

    /// Path to a TOML/JSON config file with the endpoint catalog
    #[arg(long, short = 'C')]
    pub config: Option<String>,

    /// Print the effective endpoint catalog and exit
    #[arg(long = "print-catalog")]
    pub print_catalog: bool,

    /// Enable debug logging (one event per request)
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
