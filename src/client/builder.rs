use crate::client::core::SpeechCloudFacade;
use crate::config::SpeechCloudConfig;
use crate::credentials::{ChainCredentialsProvider, CredentialsProvider};
use crate::diagnostics::DiagnosticSink;
use crate::transport::{HttpSpeechCloudClient, SpeechCloudBackend};
use crate::{Error, ErrorContext, Result};
use std::path::Path;
use std::sync::Arc;

/// Builder for [`SpeechCloudFacade`].
///
/// Either inject a backend directly (tests, custom transports) or let the
/// builder create an [`HttpSpeechCloudClient`] from configuration and
/// credentials.
pub struct SpeechCloudFacadeBuilder {
    config: Option<SpeechCloudConfig>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    backend: Option<Arc<dyn SpeechCloudBackend>>,
    diagnostics: Arc<dyn DiagnosticSink>,
    /// Override the configured endpoint (primarily for testing with mock servers)
    endpoint_override: Option<String>,
}

impl SpeechCloudFacadeBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            credentials: None,
            backend: None,
            diagnostics: crate::diagnostics::tracing_sink(),
            endpoint_override: None,
        }
    }

    pub fn config(mut self, config: SpeechCloudConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a YAML file (environment overrides applied).
    pub async fn config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.config = Some(SpeechCloudConfig::from_file(path).await?);
        Ok(self)
    }

    pub fn credentials(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Use an externally constructed backend; configuration and credentials are then ignored.
    pub fn backend(mut self, backend: Arc<dyn SpeechCloudBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Inject a diagnostic sink. Default forwards to `tracing`.
    pub fn diagnostics_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    /// Build the facade.
    ///
    /// Without an injected backend, credentials are resolved once, here; if
    /// none are available the build fails with the fixed misconfiguration
    /// error. The configured output format applies to every speech request.
    pub fn build(self) -> Result<SpeechCloudFacade> {
        let mut config = self.config.unwrap_or_else(SpeechCloudConfig::from_env);
        if let Some(endpoint) = self.endpoint_override {
            config.endpoint = endpoint;
        }

        let backend = match self.backend {
            Some(backend) => backend,
            None => {
                let provider = self
                    .credentials
                    .unwrap_or_else(|| Arc::new(ChainCredentialsProvider::default()));
                let credentials = provider.credentials().map_err(|e| {
                    Error::misconfigured(
                        ErrorContext::new()
                            .with_source(format!("credentials.{}", provider.name()))
                            .with_details(e.to_string()),
                    )
                })?;
                tracing::info!(
                    endpoint = %config.endpoint,
                    credentials = provider.name(),
                    "Create new speech cloud facade"
                );
                Arc::new(HttpSpeechCloudClient::new(&config, credentials)?)
            }
        };

        Ok(SpeechCloudFacade {
            backend,
            diagnostics: self.diagnostics,
            output_format: config.output_format(),
        })
    }
}

impl Default for SpeechCloudFacadeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
