use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::time::Instant;
use tracing::{debug, error};

use super::transport::{ErrorKind, Transport, TransportError, TransportRequest};
use crate::args::HttpMethod;
use crate::catalog::template::{TemplateContext, render_template};
use crate::catalog::{EndpointCatalog, EndpointSpec};
use crate::metrics::MetricsAggregator;

/// Result of one request, handed to the caller and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub method: HttpMethod,
    pub url: String,
    pub success: bool,
    pub status_code: Option<u16>,
    pub error_kind: Option<ErrorKind>,
    pub timestamp: DateTime<Utc>,
    pub latency: Duration,
}

/// Issues requests against one base URL and counts each completed one.
///
/// Success means the transport completed the exchange. A 404 or 500 is a
/// success here; only timeouts, refused connections, DNS/TLS failures and
/// broken bodies count as failures.
pub struct RequestExecutor<T> {
    transport: T,
    base_url: String,
    catalog: Arc<EndpointCatalog>,
    metrics: Arc<MetricsAggregator>,
    issued: AtomicU64,
}

impl<T> RequestExecutor<T>
where
    T: Transport,
{
    /// `base_url` should already be validated by
    /// [`parse_base_url`](super::parse_base_url).
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        catalog: Arc<EndpointCatalog>,
        metrics: Arc<MetricsAggregator>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            catalog,
            metrics,
            issued: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn metrics(&self) -> &Arc<MetricsAggregator> {
        &self.metrics
    }

    /// Requests started so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Base URL joined with the path template rendered for call `seq`.
    #[must_use]
    pub fn build_url(&self, endpoint: &EndpointSpec, seq: u64) -> String {
        let path = render_template(endpoint.path(), &TemplateContext::new(seq));
        format!("{}{}", self.base_url, path)
    }

    /// Picks an endpoint from the catalog and executes it.
    pub async fn execute_next(&self) -> RequestOutcome {
        let endpoint = {
            let mut rng = rand::thread_rng();
            Arc::clone(self.catalog.select(&mut rng))
        };
        self.execute(&endpoint).await
    }

    /// Executes one endpoint. Never fails: transport errors are counted,
    /// logged, and reported in the outcome.
    pub async fn execute(&self, endpoint: &EndpointSpec) -> RequestOutcome {
        self.issued.fetch_add(1, Ordering::Relaxed);
        let seq = endpoint.next_seq();
        let method = endpoint.method();
        let url = self.build_url(endpoint, seq);
        let request = TransportRequest {
            method,
            url: url.clone(),
            body: endpoint.body_for(seq),
            timeout: endpoint.timeout(),
        };

        let start = Instant::now();
        let result = self.transport.send(request).await;
        let timestamp = Utc::now();

        match result {
            Ok(response) => {
                self.metrics.record_success(method);
                debug!(
                    method = %method,
                    url = %url,
                    status = response.status,
                    latency_ms = u64::try_from(response.latency.as_millis()).unwrap_or(u64::MAX),
                    "Request completed"
                );
                RequestOutcome {
                    method,
                    url,
                    success: true,
                    status_code: Some(response.status),
                    error_kind: None,
                    timestamp,
                    latency: response.latency,
                }
            }
            Err(failure) => {
                self.metrics.record_failure(method);
                log_failure(method, &url, timestamp, &failure);
                RequestOutcome {
                    method,
                    url,
                    success: false,
                    status_code: failure.status,
                    error_kind: Some(failure.kind),
                    timestamp,
                    latency: start.elapsed(),
                }
            }
        }
    }
}

fn log_failure(method: HttpMethod, url: &str, timestamp: DateTime<Utc>, failure: &TransportError) {
    error!(
        timestamp = %timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        method = %method,
        url = %url,
        error_kind = %failure.kind,
        status = ?failure.status,
        response_body = ?failure.response_body,
        "Request failed: {}",
        failure.message
    );
}
