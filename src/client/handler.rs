//! Completion handlers for synthesized speech.
//!
//! A [`SpeechResultHandler`] is called exactly once by
//! [`SpeechCloudFacade::create_speech_and_handle`](crate::SpeechCloudFacade::create_speech_and_handle),
//! before that call returns. The handler owns the job of draining the audio
//! stream; failures while doing so stay inside the handler.

use crate::types::SpeechResult;
use crate::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait SpeechResultHandler: Send + Sync {
    async fn handle(&self, result: &mut SpeechResult);
}

/// Handler backed by a closure returning a boxed future.
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure as a [`SpeechResultHandler`].
///
/// ```rust,no_run
/// use speech_cloud_rust::client::handler::handler_fn;
///
/// let handler = handler_fn(|result| {
///     Box::pin(async move {
///         let _ = result.body_mut().read_to_end().await;
///     })
/// });
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut SpeechResult) -> BoxFuture<'a, ()> + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> SpeechResultHandler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut SpeechResult) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn handle(&self, result: &mut SpeechResult) {
        (self.f)(result).await
    }
}

/// Writes the audio to a local file.
///
/// I/O failures are logged and swallowed; the stream is released either way.
pub struct FileSpeechHandler {
    path: PathBuf,
    bytes_written: AtomicU64,
}

impl FileSpeechHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bytes_written: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written by the last successful invocation.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    async fn write(&self, result: &mut SpeechResult) -> Result<u64> {
        let mut file = tokio::fs::File::create(&self.path).await?;
        let copied = result.body_mut().copy_to(&mut file).await?;
        file.flush().await?;
        Ok(copied)
    }
}

#[async_trait]
impl SpeechResultHandler for FileSpeechHandler {
    async fn handle(&self, result: &mut SpeechResult) {
        match self.write(result).await {
            Ok(copied) => {
                self.bytes_written.store(copied, Ordering::Relaxed);
                tracing::info!(path = %self.path.display(), bytes = copied, "speech written");
            }
            Err(e) => {
                tracing::error!(
                    "Cannot write to path '{}' because {}",
                    self.path.display(),
                    e
                );
            }
        }
        result.body_mut().close();
    }
}

/// Collects the audio in memory.
#[derive(Default)]
pub struct BufferSpeechHandler {
    buffer: Mutex<Vec<u8>>,
    invocations: AtomicU64,
}

impl BufferSpeechHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio(&self) -> Vec<u8> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechResultHandler for BufferSpeechHandler {
    async fn handle(&self, result: &mut SpeechResult) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        match result.body_mut().read_to_end().await {
            Ok(audio) => {
                *self.buffer.lock().unwrap_or_else(|e| e.into_inner()) = audio;
            }
            Err(e) => tracing::error!("Cannot read speech audio because {}", e),
        }
    }
}
