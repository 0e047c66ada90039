use crate::args::DEFAULT_ENDPOINT_TIMEOUT;
use crate::config::{to_duration, types::ConfigFile};
use crate::error::{AppError, AppResult};

use super::builtin::builtin_endpoints;
use super::endpoint::EndpointSpec;
use super::template::TemplateBody;
use super::{EndpointCatalog, MethodSplit};

/// Builds the effective catalog: config endpoints when present, otherwise
/// the built-in table, with the config split or the default split.
///
/// # Errors
///
/// Returns an error when an endpoint or the split is invalid.
pub fn resolve_catalog(config: Option<&ConfigFile>) -> AppResult<EndpointCatalog> {
    let split = config
        .and_then(|config| config.split.as_ref())
        .map_or_else(MethodSplit::default, |split| MethodSplit {
            get: split.get.unwrap_or(0),
            post: split.post.unwrap_or(0),
            delete: split.delete.unwrap_or(0),
        });

    let endpoints = match config.and_then(|config| config.endpoints.as_ref()) {
        Some(configured) if !configured.is_empty() => {
            let mut endpoints = Vec::with_capacity(configured.len());
            for (index, entry) in configured.iter().enumerate() {
                let timeout = match entry.timeout.as_ref() {
                    Some(value) => to_duration(value, &format!("endpoints[{}].timeout", index))?,
                    None => DEFAULT_ENDPOINT_TIMEOUT,
                };
                let mut endpoint =
                    EndpointSpec::new(entry.method, entry.path.clone(), entry.weight, timeout)
                        .map_err(AppError::catalog)?;
                if let Some(body) = entry.body.clone() {
                    endpoint = endpoint.with_body(TemplateBody::new(body));
                }
                endpoints.push(endpoint);
            }
            endpoints
        }
        Some(_) | None => builtin_endpoints().map_err(AppError::catalog)?,
    };

    EndpointCatalog::new(split, endpoints).map_err(AppError::catalog)
}
