use thiserror::Error;

use crate::args::HttpMethod;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Method split selects no category; give at least one of get/post/delete a weight.")]
    NoActiveCategory,
    #[error("Method split gives {method} weight {weight} but the catalog has no {method} endpoints.")]
    EmptyCategory { method: HttpMethod, weight: u64 },
    #[error("Endpoint {method} '{path}' must have a weight >= 1.")]
    ZeroWeight { method: HttpMethod, path: String },
    #[error("Endpoint {method} '{path}' must have a timeout > 0.")]
    ZeroTimeout { method: HttpMethod, path: String },
    #[error("Endpoint {method} path must not be empty.")]
    EmptyPath { method: HttpMethod },
    #[error("Endpoint {method} path '{path}' must start with '/'.")]
    RelativePath { method: HttpMethod, path: String },
    #[error("Total weight overflow in {method} endpoints.")]
    WeightOverflow { method: HttpMethod },
}
