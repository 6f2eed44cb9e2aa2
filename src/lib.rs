//! # speech-cloud-rust
//!
//! 语音云 TTS 门面：列出音色、获取发音词典、生成语音（URL 或音频流）。
//!
//! A facade over the Ivona Speech Cloud text-to-speech API.
//!
//! ## Overview
//!
//! The facade lists voices, lists and fetches pronunciation lexicons, and
//! requests speech either as a presigned URL or as an audio stream handed to a
//! completion handler. Remote work is delegated to a [`SpeechCloudBackend`];
//! the facade itself resolves optional selectors, wraps encoding failures and
//! runs the handler hook.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speech_cloud_rust::{FileSpeechHandler, SpeechCloudFacade};
//!
//! #[tokio::main]
//! async fn main() -> speech_cloud_rust::Result<()> {
//!     // Credentials from the OS keyring or IVONA_ACCESS_KEY / IVONA_SECRET_KEY.
//!     let facade = SpeechCloudFacade::builder().build()?;
//!
//!     for voice in facade.list_voices(None).await? {
//!         println!("{}", voice.name);
//!     }
//!
//!     let url = facade.create_speech_url("Salli", "This is Salli in the cloud.").await?;
//!     println!("{url}");
//!
//!     let handler = FileSpeechHandler::new("/tmp/salli.mp3");
//!     facade
//!         .create_speech_and_handle("Salli", "This is Salli in downloadable mode.", &handler)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Facade, builder, selector resolution and completion handlers |
//! | [`transport`] | Backend trait, HTTP client and SigV4 signing |
//! | [`types`] | Voices, lexicons, speech requests and results |
//! | [`config`] | YAML / environment configuration |
//! | [`credentials`] | Credential providers |
//! | [`diagnostics`] | Structured diagnostic events and sinks |

pub mod client;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod transport;
pub mod types;

pub use client::{
    handler_fn, BufferSpeechHandler, FileSpeechHandler, SpeechCloudFacade,
    SpeechCloudFacadeBuilder, SpeechResultHandler,
};
pub use config::SpeechCloudConfig;
pub use credentials::{Credentials, CredentialsProvider};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink};
pub use transport::{HttpSpeechCloudClient, SpeechCloudBackend};
pub use types::{
    GetLexiconRequest, Lexicon, ListVoicesRequest, SpeechRequest, SpeechResult, Voice,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
