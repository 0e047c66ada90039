use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("{count} request task(s) panicked in batch {batch}: {first}")]
    TaskPanicked {
        batch: u64,
        count: usize,
        first: String,
    },
    #[error("Request task in batch {batch} was cancelled.")]
    TaskCancelled { batch: u64 },
}
