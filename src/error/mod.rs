mod app;
mod catalog;
mod config;
mod http;
mod scheduler;
mod validation;

pub use app::{AppError, AppResult};
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use http::HttpError;
pub use scheduler::SchedulerError;
pub use validation::ValidationError;
