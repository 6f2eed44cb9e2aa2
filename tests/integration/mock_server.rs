//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use speech_cloud_rust::credentials::{CredentialsProvider, StaticCredentialsProvider};
use speech_cloud_rust::diagnostics::InMemoryDiagnosticSink;
use speech_cloud_rust::{SpeechCloudConfig, SpeechCloudFacade};
use std::sync::Arc;

pub const ACCESS_KEY: &str = "AKIDTEST";
pub const SECRET_KEY: &str = "test-secret";

/// Matches the SigV4 `Authorization` header produced for POST actions.
pub fn signed_authorization() -> Matcher {
    Matcher::Regex(format!(
        r"^AWS4-HMAC-SHA256 Credential={}/\d{{8}}/eu-west-1/tts/aws4_request, SignedHeaders=content-type;host;x-amz-date, Signature=[0-9a-f]{{64}}$",
        ACCESS_KEY
    ))
}

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
    pub diagnostics: Arc<InMemoryDiagnosticSink>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server,
            base_url,
            diagnostics: Arc::new(InMemoryDiagnosticSink::new()),
        }
    }

    /// Facade whose HTTP backend points at the mock server.
    pub fn facade(&self) -> SpeechCloudFacade {
        self.facade_with(
            SpeechCloudConfig::default(),
            Arc::new(StaticCredentialsProvider::new(ACCESS_KEY, SECRET_KEY)),
        )
    }

    /// Same as [`facade`](Self::facade) with a custom config and credentials.
    pub fn facade_with(
        &self,
        config: SpeechCloudConfig,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> SpeechCloudFacade {
        SpeechCloudFacade::builder()
            .config(config.with_timeout_secs(5))
            .endpoint_override(&self.base_url)
            .credentials(credentials)
            .diagnostics_sink(self.diagnostics.clone())
            .build()
            .expect("facade should build against mock server")
    }

    /// Create a mock for a successful JSON action
    pub async fn mock_action(&mut self, action: &str, body: &str) -> Mock {
        self.server
            .mock("POST", format!("/{}", action).as_str())
            .match_header("authorization", signed_authorization())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for a JSON action that also checks the request body
    pub async fn mock_action_with_body(
        &mut self,
        action: &str,
        request: serde_json::Value,
        body: &str,
    ) -> Mock {
        self.server
            .mock("POST", format!("/{}", action).as_str())
            .match_body(Matcher::Json(request))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for synthesized audio
    pub async fn mock_speech(&mut self, audio: &[u8]) -> Mock {
        self.server
            .mock("POST", "/CreateSpeech")
            .match_header("authorization", signed_authorization())
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_header("x-amzn-IvonaTtsRequestId", "req-1234")
            .with_header("x-amzn-IvonaTtsRequestCharacters", "35")
            .with_header("x-amzn-IvonaTtsRequestUnits", "1")
            .with_body(audio)
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error(&mut self, action: &str, status: usize, error_body: &str) -> Mock {
        self.server
            .mock("POST", format!("/{}", action).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_header("x-amzn-ErrorType", "RemoteError")
            .with_body(error_body)
            .create_async()
            .await
    }
}
