use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{GeneratorArgs, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Flags given on the command line or through their environment variable
/// win over the file; the file wins over built-in defaults.
///
/// # Errors
///
/// Returns an error when config values are out of range.
pub fn apply_config(
    args: &mut GeneratorArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_explicit(matches, "concurrent_requests")
        && let Some(value) = config.concurrent_requests
    {
        args.concurrent_requests = ensure_positive_usize(value, "concurrent_requests")?;
    }

    if !is_explicit(matches, "report_interval")
        && let Some(value) = config.report_interval
    {
        args.report_interval = ensure_positive_u64(value, "report_interval")?;
    }

    if !is_explicit(matches, "batch_delay")
        && let Some(value) = config.batch_delay.as_ref()
    {
        args.batch_delay = to_duration(value, "batch_delay")?;
    }

    if !is_explicit(matches, "connect_timeout")
        && let Some(value) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(value, "connect_timeout")?;
    }

    if !is_explicit(matches, "redirect_limit")
        && let Some(value) = config.redirect_limit
    {
        args.redirect_limit = value;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

pub(crate) fn to_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}
