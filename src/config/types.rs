use std::time::Duration;

use serde::Deserialize;

use crate::args::HttpMethod;
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub concurrent_requests: Option<usize>,
    pub report_interval: Option<u64>,
    pub batch_delay: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub redirect_limit: Option<u32>,
    pub split: Option<SplitConfig>,
    pub endpoints: Option<Vec<EndpointConfig>>,
}

/// Category weights. Omitted categories get weight 0.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SplitConfig {
    pub get: Option<u64>,
    pub post: Option<u64>,
    pub delete: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default = "default_endpoint_weight")]
    pub weight: u64,
    pub timeout: Option<DurationValue>,
    /// JSON-shaped body whose string leaves are templates.
    pub body: Option<serde_json::Value>,
}

const fn default_endpoint_weight() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
