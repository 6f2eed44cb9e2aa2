use crate::client::handler::SpeechResultHandler;
use crate::client::selector::resolve_selector;
use crate::diagnostics::DiagnosticSink;
use crate::transport::{SpeechCloudBackend, SpeechUrlError};
use crate::types::{
    GetLexiconRequest, Lexicon, ListVoicesRequest, OutputFormat, SpeechRequest, SpeechResult, Voice,
};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Facade over the Speech Cloud API.
///
/// Holds one long-lived backend handle. A facade cannot exist without a
/// backend; see [`SpeechCloudFacadeBuilder`](crate::SpeechCloudFacadeBuilder)
/// for the path that builds the HTTP backend from configuration.
pub struct SpeechCloudFacade {
    pub(crate) backend: Arc<dyn SpeechCloudBackend>,
    pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
    pub(crate) output_format: OutputFormat,
}

impl SpeechCloudFacade {
    /// Wrap an existing backend. Diagnostics go to `tracing`.
    pub fn new(backend: Arc<dyn SpeechCloudBackend>) -> Self {
        Self {
            backend,
            diagnostics: crate::diagnostics::tracing_sink(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn builder() -> crate::client::builder::SpeechCloudFacadeBuilder {
        crate::client::builder::SpeechCloudFacadeBuilder::new()
    }

    /// Replace the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Audio format requested by `create_speech*`. Default MP3 at 22050 Hz.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn backend(&self) -> &Arc<dyn SpeechCloudBackend> {
        &self.backend
    }

    /// List available voices.
    ///
    /// `selectors` may be `None`, `Some(request)`, or any collection; only the
    /// first selector is honored.
    pub async fn list_voices<I>(&self, selectors: I) -> Result<Vec<Voice>>
    where
        I: IntoIterator<Item = ListVoicesRequest>,
    {
        let request: ListVoicesRequest = resolve_selector(selectors, self.diagnostics.as_ref());
        let voices = self.backend.list_voices(&request).await?;
        debug!(count = voices.len(), "listed voices");
        Ok(voices)
    }

    /// Names of all lexicons stored for the account. Empty when none exist.
    pub async fn list_lexicon_names(&self) -> Result<Vec<String>> {
        self.backend.list_lexicons().await
    }

    /// Fetch one lexicon. Selector handling matches [`list_voices`](Self::list_voices).
    pub async fn get_lexicon<I>(&self, selectors: I) -> Result<Lexicon>
    where
        I: IntoIterator<Item = GetLexiconRequest>,
    {
        let request: GetLexiconRequest = resolve_selector(selectors, self.diagnostics.as_ref());
        self.backend.get_lexicon(&request).await
    }

    /// Retrievable URL that yields the synthesized speech when fetched.
    ///
    /// Fails with [`Error::UnsupportedEncoding`] when the request cannot be
    /// encoded into a URL.
    pub async fn create_speech_url(&self, voice_name: &str, text: &str) -> Result<Url> {
        let request = self.speech_request(voice_name, text);
        match self.backend.create_speech_url(&request).await {
            Ok(url) => {
                info!(voice = voice_name, "speech URL created");
                Ok(url)
            }
            Err(SpeechUrlError::Encoding(e)) => Err(Error::unsupported_encoding(e)),
            Err(SpeechUrlError::Backend(e)) => Err(e),
        }
    }

    /// Synthesize speech and hand back the unread audio stream.
    ///
    /// The caller owns the stream; dropping the result releases it.
    pub async fn create_speech(&self, voice_name: &str, text: &str) -> Result<SpeechResult> {
        let request = self.speech_request(voice_name, text);
        self.backend.create_speech(&request).await
    }

    /// Synthesize speech, run `handler` once on the result, then return it.
    ///
    /// The handler runs before this call returns and is expected to drain the
    /// stream. Anything it fails on internally is not reported here.
    pub async fn create_speech_and_handle<H>(
        &self,
        voice_name: &str,
        text: &str,
        handler: &H,
    ) -> Result<SpeechResult>
    where
        H: SpeechResultHandler + ?Sized,
    {
        let mut result = self.create_speech(voice_name, text).await?;
        handler.handle(&mut result).await;
        Ok(result)
    }

    fn speech_request(&self, voice_name: &str, text: &str) -> SpeechRequest {
        Self::new_speech_request(voice_name, text).with_output_format(self.output_format)
    }

    /// Build a speech request for `speaker_name` reading `data`. No validation.
    pub fn new_speech_request(speaker_name: &str, data: &str) -> SpeechRequest {
        SpeechRequest::new(speaker_name, data)
    }
}
