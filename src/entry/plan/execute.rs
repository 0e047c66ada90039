use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AppResult;
use crate::http::{ClientSettings, ReqwestTransport, RequestExecutor};
use crate::metrics::MetricsAggregator;
use crate::report::Reporter;
use crate::scheduler::BatchScheduler;
use crate::shutdown::shutdown_channel;
use crate::shutdown_handlers::setup_signal_shutdown_handler;
use crate::system::banner;

use super::types::{GeneratePlan, RunPlan};

pub(in crate::entry) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::PrintCatalog(catalog) => {
            for line in catalog.describe_lines() {
                println!("{}", line);
            }
            Ok(())
        }
        RunPlan::Generate(plan) => generate(*plan).await,
    }
}

async fn generate(plan: GeneratePlan) -> AppResult<()> {
    let GeneratePlan {
        args,
        base_url,
        catalog,
    } = plan;

    let transport = ReqwestTransport::new(&ClientSettings::from_args(&args))?;
    let metrics = Arc::new(MetricsAggregator::new());
    let report_interval = Duration::from_secs(args.report_interval.get());
    let reporter = Reporter::new(report_interval, Arc::clone(&metrics));

    banner::print_cli_banner(args.no_color);
    for line in banner::startup_lines(
        &base_url,
        args.concurrent_requests.get(),
        report_interval,
        args.batch_delay,
    ) {
        println!("{}", line);
    }

    let executor = Arc::new(RequestExecutor::new(
        transport,
        base_url,
        Arc::new(catalog),
        Arc::clone(&metrics),
    ));

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut scheduler = BatchScheduler::new(
        executor,
        args.concurrent_requests,
        args.batch_delay,
        reporter.clone(),
    );
    let result = scheduler.run(&mut shutdown_rx).await;
    signal_handle.abort();
    let summary = result?;

    if summary.signal.is_none() {
        warn!("Shutdown channel closed without a signal.");
    }
    debug!(
        batches = summary.batches,
        requests = summary.requests,
        "Scheduler stopped"
    );
    reporter.report_final();
    Ok(())
}
