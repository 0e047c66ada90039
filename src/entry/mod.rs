//! Process entry: parse arguments, set up logging and the runtime, then
//! build and execute the run plan.
mod plan;

use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::error;

use crate::args::GeneratorArgs;
use crate::error::{AppError, AppResult};
use plan::{build_plan, execute_plan};

/// Runs the generator until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error for invalid arguments, an invalid catalog or base
/// URL, or a fatal scheduler failure. The binary exits non-zero on error.
pub fn run() -> AppResult<()> {
    let (args, matches) = parse_args(std::env::args_os())?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args<I>(raw_args: I) -> AppResult<(GeneratorArgs, ArgMatches)>
where
    I: IntoIterator<Item = OsString>,
{
    // Help and version exit 0 through clap; usage errors are startup
    // failures and exit 1 like every other fatal error.
    let matches = match GeneratorArgs::command().try_get_matches_from(raw_args) {
        Ok(matches) => matches,
        Err(err) if err.use_stderr() => {
            if let Err(print_err) = err.print() {
                eprintln!("{}", print_err);
            }
            return Err(AppError::from(err));
        }
        Err(err) => err.exit(),
    };
    let args = GeneratorArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: GeneratorArgs, matches: &ArgMatches) -> AppResult<()> {
    let result = match build_plan(args, matches) {
        Ok(plan) => execute_plan(plan).await,
        Err(err) => Err(err),
    };
    if let Err(err) = result.as_ref() {
        error!("Fatal error: {}", err);
    }
    result
}
