//! Runtime configuration: endpoint, region, HTTP knobs and default audio format.
//!
//! Values come from [`SpeechCloudConfig::default`], optionally a YAML file, and
//! finally environment overrides:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `IVONA_ENDPOINT` | `endpoint` |
//! | `IVONA_REGION` | `region` |
//! | `IVONA_HTTP_TIMEOUT_SECS` | `timeout_secs` |
//! | `IVONA_URL_EXPIRY_SECS` | `url_expiry_secs` |
//! | `IVONA_PROXY_URL` | `proxy_url` |
//! | `IVONA_CODEC` | `codec` |

use crate::types::{Codec, OutputFormat};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://tts.eu-west-1.ivonacloud.com";
pub const DEFAULT_REGION: &str = "eu-west-1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechCloudConfig {
    pub endpoint: String,
    pub region: String,
    pub timeout_secs: u64,
    /// Lifetime of presigned speech URLs.
    pub url_expiry_secs: u64,
    pub proxy_url: Option<String>,
    pub pool_max_idle_per_host: usize,
    pub codec: Codec,
    pub sample_rate: Option<u32>,
}

impl Default for SpeechCloudConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout_secs: 30,
            url_expiry_secs: 300,
            proxy_url: None,
            pool_max_idle_per_host: 8,
            codec: Codec::Mp3,
            sample_rate: Some(22050),
        }
    }
}

impl SpeechCloudConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid configuration: {}", e),
                ErrorContext::new().with_source("config.yaml"),
            )
        })
    }

    /// Load a YAML file; environment overrides are applied on top.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read configuration file: {}", e),
                ErrorContext::new()
                    .with_source("config.yaml")
                    .with_field_path(path.display().to_string()),
            )
        })?;
        tracing::info!(path = %path.display(), "loaded speech cloud configuration");
        Ok(Self::from_yaml_str(&content)?.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable numbers are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("IVONA_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(region) = lookup("IVONA_REGION") {
            self.region = region;
        }
        if let Some(secs) = lookup("IVONA_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(secs) = lookup("IVONA_URL_EXPIRY_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.url_expiry_secs = secs;
        }
        if let Some(proxy) = lookup("IVONA_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Some(codec) = lookup("IVONA_CODEC").and_then(|s| s.parse::<Codec>().ok()) {
            self.codec = codec;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.codec = format.codec;
        self.sample_rate = format.sample_rate;
        self
    }

    /// Audio format applied to every speech request.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat {
            codec: self.codec,
            sample_rate: self.sample_rate,
        }
    }

    /// Parsed endpoint, normalized with a trailing slash so action names join
    /// onto it rather than replacing its last path segment.
    pub fn endpoint_url(&self) -> Result<Url> {
        let mut raw = self.endpoint.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint: {}", e),
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_details(self.endpoint.clone()),
            )
        })
    }
}
