use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Url, redirect};
use tokio::time::Instant;

use super::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::args::{DEFAULT_USER_AGENT, GeneratorArgs};
use crate::error::{AppError, AppResult, HttpError};

/// Bytes of response body kept for failure records.
const BODY_PREVIEW_LIMIT: usize = 1024;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub redirect_limit: u32,
    pub user_agent: String,
}

impl ClientSettings {
    #[must_use]
    pub fn from_args(args: &GeneratorArgs) -> Self {
        Self {
            connect_timeout: args.connect_timeout,
            redirect_limit: args.redirect_limit,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Validates the base URL and strips trailing slashes so endpoint paths
/// can be appended directly.
///
/// # Errors
///
/// Returns an error when the URL does not parse or is not http/https.
pub fn parse_base_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: trimmed.to_owned(),
            source: err,
        })
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_owned()),
        other => Err(AppError::http(HttpError::UnsupportedScheme {
            url: trimmed.to_owned(),
            scheme: other.to_owned(),
        })),
    }
}

/// [`Transport`] backed by a pooled reqwest client. Status codes are never
/// validated; the body is drained so the exchange completes before it is
/// counted.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> AppResult<Self> {
        let redirect_policy = if settings.redirect_limit == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(usize::try_from(settings.redirect_limit).unwrap_or(10))
        };

        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect_policy)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClient { source: err }))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let start = Instant::now();
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .timeout(request.timeout);
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::from_reqwest(&err))?;
        let status = response.status().as_u16();

        match drain_response_body(response).await {
            Ok(response_bytes) => Ok(TransportResponse {
                status,
                latency: start.elapsed(),
                response_bytes,
            }),
            Err((err, preview)) => {
                let mut failure = TransportError::from_reqwest(&err);
                failure.status = Some(status);
                if !preview.is_empty() {
                    failure.response_body = Some(String::from_utf8_lossy(&preview).into_owned());
                }
                Err(failure)
            }
        }
    }
}

/// Reads the body to the end, keeping a short preview in case the stream
/// fails part way.
async fn drain_response_body(
    response: reqwest::Response,
) -> Result<u64, (reqwest::Error, Vec<u8>)> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    let mut preview: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(err) => return Err((err, preview)),
        };
        let room = BODY_PREVIEW_LIMIT.saturating_sub(preview.len());
        if let Some(head) = bytes.get(..room.min(bytes.len())) {
            preview.extend_from_slice(head);
        }
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
