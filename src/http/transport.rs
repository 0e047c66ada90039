use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::args::HttpMethod;

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// A completed exchange. Any status code counts, including 4xx/5xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub latency: Duration,
    pub response_bytes: u64,
}

/// Transport-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Decode,
    Request,
    Builder,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connect => "connect",
            ErrorKind::Redirect => "redirect",
            ErrorKind::Body => "body",
            ErrorKind::Decode => "decode",
            ErrorKind::Request => "request",
            ErrorKind::Builder => "builder",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Maps a reqwest error onto the classification. Timeout is checked
    /// first since a timed-out connect also reports `is_connect`.
    #[must_use]
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connect
        } else if err.is_redirect() {
            ErrorKind::Redirect
        } else if err.is_body() {
            ErrorKind::Body
        } else if err.is_decode() {
            ErrorKind::Decode
        } else if err.is_builder() {
            ErrorKind::Builder
        } else if err.is_request() {
            ErrorKind::Request
        } else {
            ErrorKind::Unknown
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The exchange did not complete. `status` and `response_body` are set
/// when the failure happened after the response head arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub response_body: Option<String>,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            response_body: None,
        }
    }

    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::classify(err),
            message: err.to_string(),
            status: err.status().map(|status| status.as_u16()),
            response_body: None,
        }
    }
}

/// Performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T> Transport for std::sync::Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}
