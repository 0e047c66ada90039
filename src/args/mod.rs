//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;
mod types;


pub use cli::GeneratorArgs;
pub use types::{HttpMethod, PositiveU64, PositiveUsize};

pub(crate) use defaults::{DEFAULT_ENDPOINT_TIMEOUT, DEFAULT_USER_AGENT};
