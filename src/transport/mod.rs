//! 传输层模块：语音云后端接口及其 HTTP 实现。
//!
//! The backend seam of the facade. [`SpeechCloudBackend`] is the collaborator
//! the facade delegates every remote operation to; [`HttpSpeechCloudClient`]
//! is the production implementation speaking the Speech Cloud HTTP API.

pub mod http;
pub mod signer;

pub use http::HttpSpeechCloudClient;
pub use signer::SigV4Signer;

use crate::types::{GetLexiconRequest, Lexicon, ListVoicesRequest, SpeechRequest, SpeechResult, Voice};
use crate::Result;
use async_trait::async_trait;
use url::Url;

/// Remote Speech Cloud operations.
#[async_trait]
pub trait SpeechCloudBackend: Send + Sync {
    async fn list_voices(&self, request: &ListVoicesRequest) -> Result<Vec<Voice>>;

    async fn list_lexicons(&self) -> Result<Vec<String>>;

    async fn get_lexicon(&self, request: &GetLexiconRequest) -> Result<Lexicon>;

    /// Build a retrievable URL that synthesizes `request` when fetched.
    async fn create_speech_url(
        &self,
        request: &SpeechRequest,
    ) -> std::result::Result<Url, SpeechUrlError>;

    /// Synthesize `request`, returning the audio as an unread stream.
    async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechResult>;
}

/// Failure to encode a speech request into a URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlEncodingError {
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("character {character:?} at byte {position} cannot be encoded in a speech URL")]
    UnencodableCharacter { character: char, position: usize },
}

/// Error returned by [`SpeechCloudBackend::create_speech_url`].
#[derive(Debug, thiserror::Error)]
pub enum SpeechUrlError {
    #[error(transparent)]
    Encoding(#[from] UrlEncodingError),

    #[error(transparent)]
    Backend(#[from] crate::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Standard error class for an HTTP status code.
pub fn error_class_for_status(status: u16) -> &'static str {
    match status {
        400 => "invalid_request",
        401 => "authentication",
        403 => "permission_denied",
        404 => "not_found",
        408 => "timeout",
        413 => "request_too_large",
        429 => "rate_limited",
        503 => "overloaded",
        500..=599 => "server_error",
        _ => "other",
    }
}
