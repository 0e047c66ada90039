use std::sync::Arc;

use tokio::task::JoinSet;

use super::BatchScheduler;
use crate::error::{AppError, AppResult, SchedulerError};
use crate::http::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// 1-based batch number.
    pub index: u64,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    #[must_use]
    pub const fn completed(&self) -> usize {
        self.succeeded.saturating_add(self.failed)
    }
}

impl<T> BatchScheduler<T>
where
    T: Transport + 'static,
{
    /// Launches `concurrency` requests at once and waits for every one of
    /// them. A failed request does not cut the batch short.
    ///
    /// # Errors
    ///
    /// Returns an error after the batch drains if any request task panicked
    /// or was cancelled.
    pub async fn run_batch(&mut self) -> AppResult<BatchReport> {
        self.batches = self.batches.saturating_add(1);
        let index = self.batches;

        let mut tasks = JoinSet::new();
        for _ in 0..self.concurrency.get() {
            let executor = Arc::clone(&self.executor);
            tasks.spawn(async move { executor.execute_next().await });
        }
        self.requests = self
            .requests
            .saturating_add(u64::try_from(self.concurrency.get()).unwrap_or(u64::MAX));

        let mut report = BatchReport {
            index,
            succeeded: 0,
            failed: 0,
        };
        let mut panics: Vec<String> = Vec::new();
        let mut cancelled = false;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) if outcome.success => {
                    report.succeeded = report.succeeded.saturating_add(1);
                }
                Ok(_) => report.failed = report.failed.saturating_add(1),
                Err(err) if err.is_panic() => panics.push(err.to_string()),
                Err(_) => cancelled = true,
            }
        }

        if let Some(first) = panics.first() {
            return Err(AppError::scheduler(SchedulerError::TaskPanicked {
                batch: index,
                count: panics.len(),
                first: first.clone(),
            }));
        }
        if cancelled {
            return Err(AppError::scheduler(SchedulerError::TaskCancelled {
                batch: index,
            }));
        }

        Ok(report)
    }
}
