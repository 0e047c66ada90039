//! Batch scheduler: fan out a fixed burst of requests, wait for all of
//! them, pause, repeat until shutdown.
mod batch;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::args::PositiveUsize;
use crate::error::AppResult;
use crate::http::{RequestExecutor, Transport};
use crate::report::Reporter;
use crate::shutdown::{ShutdownReceiver, ShutdownSignal};

pub use batch::BatchReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopping,
}

/// How a [`BatchScheduler::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: u64,
    pub requests: u64,
    /// `None` when the shutdown channel closed without a signal.
    pub signal: Option<ShutdownSignal>,
}

pub struct BatchScheduler<T> {
    executor: Arc<RequestExecutor<T>>,
    concurrency: PositiveUsize,
    batch_delay: Duration,
    reporter: Reporter,
    state: SchedulerState,
    batches: u64,
    requests: u64,
}

impl<T> BatchScheduler<T>
where
    T: Transport + 'static,
{
    #[must_use]
    pub const fn new(
        executor: Arc<RequestExecutor<T>>,
        concurrency: PositiveUsize,
        batch_delay: Duration,
        reporter: Reporter,
    ) -> Self {
        Self {
            executor,
            concurrency,
            batch_delay,
            reporter,
            state: SchedulerState::Running,
            batches: 0,
            requests: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub const fn batches(&self) -> u64 {
        self.batches
    }

    /// Runs batches until a shutdown signal arrives. Signals are observed at
    /// batch boundaries and during the inter-batch pause; a batch in flight
    /// always drains before the loop stops.
    ///
    /// # Errors
    ///
    /// Returns an error when a request task panics or is cancelled. Request
    /// failures themselves never surface here.
    pub async fn run(&mut self, shutdown_rx: &mut ShutdownReceiver) -> AppResult<RunSummary> {
        let mut signal = None;

        while self.state == SchedulerState::Running {
            let report = self.run_batch().await?;
            debug!(
                batch = report.index,
                succeeded = report.succeeded,
                failed = report.failed,
                "Batch complete"
            );
            self.reporter.report_if_due(Instant::now());

            match shutdown_rx.try_recv() {
                Ok(received) => {
                    signal = Some(received);
                    self.state = SchedulerState::Stopping;
                }
                Err(TryRecvError::Lagged(_)) => {
                    signal = Some(ShutdownSignal::Requested);
                    self.state = SchedulerState::Stopping;
                }
                Err(TryRecvError::Closed) => self.state = SchedulerState::Stopping,
                Err(TryRecvError::Empty) => {}
            }
            if self.state == SchedulerState::Stopping {
                break;
            }

            tokio::select! {
                received = shutdown_rx.recv() => {
                    signal = match received {
                        Ok(received) => Some(received),
                        Err(RecvError::Lagged(_)) => Some(ShutdownSignal::Requested),
                        Err(RecvError::Closed) => None,
                    };
                    self.state = SchedulerState::Stopping;
                }
                () = sleep(self.batch_delay) => {}
            }
        }

        Ok(RunSummary {
            batches: self.batches,
            requests: self.requests,
            signal,
        })
    }
}
