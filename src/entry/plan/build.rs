use clap::ArgMatches;

use crate::args::GeneratorArgs;
use crate::catalog::resolve_catalog;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::http::parse_base_url;

use super::types::{GeneratePlan, RunPlan};

/// Resolves config, catalog, and base URL. Anything wrong here aborts the
/// process before a single request is sent.
pub(in crate::entry) fn build_plan(
    mut args: GeneratorArgs,
    matches: &ArgMatches,
) -> AppResult<RunPlan> {
    let config = load_config(args.config.as_deref())?;
    if let Some(config) = config.as_ref() {
        apply_config(&mut args, matches, config)?;
    }

    let catalog = resolve_catalog(config.as_ref())?;
    if args.print_catalog {
        return Ok(RunPlan::PrintCatalog(catalog));
    }

    let base_url = parse_base_url(&args.url)?;
    Ok(RunPlan::Generate(Box::new(GeneratePlan {
        args,
        base_url,
        catalog,
    })))
}
