use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::transport::{ErrorKind, Transport, TransportError, TransportRequest, TransportResponse};

type Script =
    dyn Fn(&TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync;

/// In-memory transport whose outcome per request comes from a closure.
pub(crate) struct ScriptedTransport {
    script: Box<Script>,
    delay: Duration,
    calls: AtomicU64,
    seen: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(script: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            delay: Duration::ZERO,
            calls: AtomicU64::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every request completes with `status`.
    pub(crate) fn always(status: u16) -> Self {
        Self::new(move |_| respond(status))
    }

    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen(&self) -> Vec<TransportRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.script)(&request)
    }
}

pub(crate) const fn respond(status: u16) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status,
        latency: Duration::from_millis(1),
        response_bytes: 0,
    })
}

pub(crate) fn fail(kind: ErrorKind) -> Result<TransportResponse, TransportError> {
    Err(TransportError::new(kind, format!("scripted {} failure", kind)))
}
