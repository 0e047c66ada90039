use thiserror::Error;

use super::{CatalogError, ConfigError, HttpError, SchedulerError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn catalog<E>(error: E) -> Self
    where
        E: Into<CatalogError>,
    {
        error.into().into()
    }

    pub fn http<E>(error: E) -> Self
    where
        E: Into<HttpError>,
    {
        error.into().into()
    }

    pub fn scheduler<E>(error: E) -> Self
    where
        E: Into<SchedulerError>,
    {
        error.into().into()
    }
}
