//! Speech request and result types.

use super::voice::Voice;
use crate::{BoxStream, Error, ErrorContext, Result};
use bytes::Bytes;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Text payload of a speech request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "Data")]
    pub data: String,
    #[serde(rename = "Type")]
    pub content_type: String,
}

impl Input {
    pub const PLAIN_TEXT: &'static str = "text/plain";

    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: Self::PLAIN_TEXT.to_string(),
        }
    }
}

/// Audio codecs offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Codec {
    #[default]
    Mp3,
    Ogg,
    Mp4,
}

impl Codec {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Ogg => "OGG",
            Self::Mp4 => "MP4",
        }
    }

}

impl FromStr for Codec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MP3" => Ok(Self::Mp3),
            "OGG" => Ok(Self::Ogg),
            "MP4" => Ok(Self::Mp4),
            other => Err(Error::configuration_with_context(
                format!("unknown codec: {}", other),
                ErrorContext::new()
                    .with_field_path("codec")
                    .with_details("expected one of MP3, OGG, MP4"),
            )),
        }
    }
}

/// Requested audio encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputFormat {
    pub codec: Codec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            codec: Codec::Mp3,
            sample_rate: Some(22050),
        }
    }
}

/// A (voice, input) pair submitted for synthesis.
///
/// Construction is pure: neither the voice name nor the text is validated
/// locally. An empty text or an unknown voice is reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeechRequest {
    pub input: Input,
    pub output_format: OutputFormat,
    pub voice: Voice,
}

impl SpeechRequest {
    pub fn new(speaker_name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            input: Input::text(data),
            output_format: OutputFormat::default(),
            voice: Voice::new(speaker_name),
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn voice_name(&self) -> &str {
        &self.voice.name
    }

    pub fn text(&self) -> &str {
        &self.input.data
    }
}

/// Metadata returned alongside synthesized audio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechMetadata {
    pub request_id: Option<String>,
    pub content_type: Option<String>,
    pub request_characters: Option<u64>,
    pub request_units: Option<u64>,
}

/// Readable audio body of a [`SpeechResult`].
///
/// The underlying stream is released as soon as it is exhausted, fails, or
/// [`close`](Self::close) is called; dropping the value releases it too.
pub struct AudioStream {
    inner: Option<BoxStream<'static, Bytes>>,
    bytes_read: u64,
}

impl AudioStream {
    pub fn new(stream: BoxStream<'static, Bytes>) -> Self {
        Self {
            inner: Some(stream),
            bytes_read: 0,
        }
    }

    /// Stream over an in-memory buffer.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self::new(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    /// Next chunk of audio, or `None` once the stream is drained or closed.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let Some(stream) = self.inner.as_mut() else {
            return Ok(None);
        };
        match stream.next().await {
            Some(Ok(chunk)) => {
                self.bytes_read += chunk.len() as u64;
                Ok(Some(chunk))
            }
            Some(Err(e)) => {
                self.close();
                Err(e)
            }
            None => {
                self.close();
                Ok(None)
            }
        }
    }

    /// Drain the remaining audio into memory.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }

    /// Drain the remaining audio into `writer`, returning the number of bytes copied.
    pub async fn copy_to<W>(&mut self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut copied = 0u64;
        while let Some(chunk) = self.next_chunk().await? {
            if let Err(e) = writer.write_all(&chunk).await {
                self.close();
                return Err(e.into());
            }
            copied += chunk.len() as u64;
        }
        Ok(copied)
    }

    /// Release the underlying stream. Idempotent.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Total bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl std::fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("closed", &self.is_closed())
            .field("bytes_read", &self.bytes_read)
            .finish()
    }
}

/// Outcome of a synthesis call: metadata plus the audio stream.
#[derive(Debug)]
pub struct SpeechResult {
    metadata: SpeechMetadata,
    body: AudioStream,
}

impl SpeechResult {
    pub fn new(metadata: SpeechMetadata, body: AudioStream) -> Self {
        Self { metadata, body }
    }

    pub fn metadata(&self) -> &SpeechMetadata {
        &self.metadata
    }

    pub fn body(&self) -> &AudioStream {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut AudioStream {
        &mut self.body
    }

    pub fn into_body(self) -> AudioStream {
        self.body
    }
}
