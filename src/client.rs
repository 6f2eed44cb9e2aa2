//! Speech Cloud facade.
//!
//! Keep the public surface small and predictable. Implementation details are
//! split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod handler;
pub mod selector;

pub use builder::SpeechCloudFacadeBuilder;
pub use self::core::SpeechCloudFacade;
pub use handler::{handler_fn, BufferSpeechHandler, FileSpeechHandler, SpeechResultHandler};
pub use selector::{resolve_selector, Selector};
