//! Weighted endpoint catalog: what to call and how often.
mod build;
mod builtin;
mod endpoint;
pub(crate) mod template;
mod weighted;


use std::sync::Arc;

use rand::Rng;

use crate::args::{HttpMethod, PositiveU64};
use crate::error::CatalogError;

pub use build::resolve_catalog;
pub use builtin::builtin_catalog;
pub use endpoint::{BodyFactory, EndpointSpec};
pub use template::TemplateBody;
pub use weighted::WeightedSelector;

/// Share of traffic per method category. Weights are relative; a zero
/// weight disables the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSplit {
    pub get: u64,
    pub post: u64,
    pub delete: u64,
}

impl MethodSplit {
    #[must_use]
    pub const fn weight(&self, method: HttpMethod) -> u64 {
        match method {
            HttpMethod::Get => self.get,
            HttpMethod::Post => self.post,
            HttpMethod::Delete => self.delete,
        }
    }
}

impl Default for MethodSplit {
    /// 70% GET / 25% POST / 5% DELETE.
    fn default() -> Self {
        Self {
            get: 70,
            post: 25,
            delete: 5,
        }
    }
}

#[derive(Debug)]
struct Category {
    method: HttpMethod,
    endpoints: WeightedSelector<Arc<EndpointSpec>>,
}

/// Endpoints grouped by method, plus the split that picks the method.
/// Endpoint weights are relative within their own category only.
#[derive(Debug)]
pub struct EndpointCatalog {
    split: MethodSplit,
    categories: WeightedSelector<Category>,
    endpoints: Vec<Arc<EndpointSpec>>,
}

impl EndpointCatalog {
    /// # Errors
    ///
    /// Returns an error when no category has a positive split weight, when
    /// an active category has no endpoints, or when weights overflow.
    pub fn new(split: MethodSplit, endpoints: Vec<EndpointSpec>) -> Result<Self, CatalogError> {
        let endpoints: Vec<Arc<EndpointSpec>> = endpoints.into_iter().map(Arc::new).collect();

        let mut categories = Vec::new();
        for method in HttpMethod::ALL {
            let Ok(split_weight) = PositiveU64::try_from(split.weight(method)) else {
                continue;
            };
            let members: Vec<_> = endpoints
                .iter()
                .filter(|endpoint| endpoint.method() == method)
                .map(|endpoint| (Arc::clone(endpoint), endpoint.weight()))
                .collect();
            if members.is_empty() {
                return Err(CatalogError::EmptyCategory {
                    method,
                    weight: split_weight.get(),
                });
            }
            let selector = WeightedSelector::new(members)
                .ok_or(CatalogError::WeightOverflow { method })?;
            categories.push((
                Category {
                    method,
                    endpoints: selector,
                },
                split_weight,
            ));
        }

        if categories.is_empty() {
            return Err(CatalogError::NoActiveCategory);
        }
        let categories = WeightedSelector::new(categories).ok_or(CatalogError::WeightOverflow {
            method: HttpMethod::Get,
        })?;

        Ok(Self {
            split,
            categories,
            endpoints,
        })
    }

    #[must_use]
    pub const fn split(&self) -> MethodSplit {
        self.split
    }

    /// Every endpoint, including those in categories the split disables.
    #[must_use]
    pub fn endpoints(&self) -> &[Arc<EndpointSpec>] {
        &self.endpoints
    }

    /// Picks a method by the split, then an endpoint within that method by
    /// endpoint weight.
    pub fn select<R>(&self, rng: &mut R) -> &Arc<EndpointSpec>
    where
        R: Rng + ?Sized,
    {
        self.categories.pick(rng).endpoints.pick(rng)
    }

    /// Picks an endpoint within one method category. `None` when the split
    /// disables the category.
    pub fn select_in<R>(&self, method: HttpMethod, rng: &mut R) -> Option<&Arc<EndpointSpec>>
    where
        R: Rng + ?Sized,
    {
        self.categories
            .iter()
            .find(|(category, _)| category.method == method)
            .map(|(category, _)| category.endpoints.pick(rng))
    }

    /// Human-readable listing for `--print-catalog`.
    #[must_use]
    pub fn describe_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "Method split: GET {} / POST {} / DELETE {}",
            self.split.get, self.split.post, self.split.delete
        ));
        for method in HttpMethod::ALL {
            lines.push(format!("{} endpoints:", method));
            let mut any = false;
            for endpoint in self.endpoints.iter().filter(|e| e.method() == method) {
                any = true;
                lines.push(format!(
                    "  {:<45} weight={:<3} timeout={}ms{}",
                    endpoint.path(),
                    endpoint.weight().get(),
                    endpoint.timeout().as_millis(),
                    if endpoint.has_body() { " body" } else { "" }
                ));
            }
            if !any {
                lines.push("  (none)".to_owned());
            }
        }
        lines
    }
}
