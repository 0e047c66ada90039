use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::args::{HttpMethod, PositiveU64};
use crate::error::CatalogError;

/// Produces a fresh request body for every call so time-dependent and
/// random fields differ between requests. `seq` is the endpoint's own
/// call number, shared with the path template of the same request.
pub trait BodyFactory: Send + Sync {
    fn generate(&self, seq: u64) -> serde_json::Value;
}

impl<F> BodyFactory for F
where
    F: Fn(u64) -> serde_json::Value + Send + Sync,
{
    fn generate(&self, seq: u64) -> serde_json::Value {
        self(seq)
    }
}

/// One request definition. Only the call counter changes once the catalog
/// is built.
pub struct EndpointSpec {
    method: HttpMethod,
    path: String,
    weight: PositiveU64,
    timeout: Duration,
    body: Option<Arc<dyn BodyFactory>>,
    calls: AtomicU64,
}

impl EndpointSpec {
    /// # Errors
    ///
    /// Returns an error for an empty or relative path, a zero weight, or a
    /// zero timeout.
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        weight: u64,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let path = path.into();
        if path.is_empty() {
            return Err(CatalogError::EmptyPath { method });
        }
        if !path.starts_with('/') {
            return Err(CatalogError::RelativePath { method, path });
        }
        let Ok(weight) = PositiveU64::try_from(weight) else {
            return Err(CatalogError::ZeroWeight { method, path });
        };
        if timeout.is_zero() {
            return Err(CatalogError::ZeroTimeout { method, path });
        }
        Ok(Self {
            method,
            path,
            weight,
            timeout,
            body: None,
            calls: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn with_body<B>(mut self, body: B) -> Self
    where
        B: BodyFactory + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path template, relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn weight(&self) -> PositiveU64 {
        self.weight
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Claims the next per-endpoint sequence number, starting at 0.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.calls.fetch_add(1, Ordering::Relaxed)
    }

    /// Calls claimed so far.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Body for call `seq`. POST without a factory sends an empty object.
    #[must_use]
    pub fn body_for(&self, seq: u64) -> Option<serde_json::Value> {
        match (&self.body, self.method) {
            (Some(factory), _) => Some(factory.generate(seq)),
            (None, HttpMethod::Post) => Some(serde_json::Value::Object(serde_json::Map::new())),
            (None, HttpMethod::Get | HttpMethod::Delete) => None,
        }
    }
}

impl fmt::Debug for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSpec")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("weight", &self.weight.get())
            .field("timeout", &self.timeout)
            .field("has_body", &self.has_body())
            .field("calls", &self.calls())
            .finish()
    }
}
