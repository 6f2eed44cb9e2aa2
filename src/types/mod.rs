//! 类型系统模块：定义语音云 API 的核心数据类型（音色、词典、语音请求与结果）。
//!
//! # Types Module
//!
//! Strongly-typed representations of the Speech Cloud primitives. Wire names
//! follow the service's PascalCase JSON convention.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Voice`] | Named synthesis persona (name, language, gender) |
//! | [`ListVoicesRequest`] | Optional filter for voice listing |
//! | [`Lexicon`] | Named set of custom pronunciation rules |
//! | [`GetLexiconRequest`] | Selector for a single lexicon |
//! | [`SpeechRequest`] | Voice + input text submitted for synthesis |
//! | [`SpeechResult`] | Synthesis outcome owning the audio byte stream |
//! | [`AudioStream`] | Readable, single-use audio body |

pub mod lexicon;
pub mod speech;
pub mod voice;

pub use lexicon::{GetLexiconRequest, Lexicon};
pub use speech::{AudioStream, Codec, Input, OutputFormat, SpeechMetadata, SpeechRequest, SpeechResult};
pub use voice::{Gender, ListVoicesRequest, Voice, VoiceFilter};
