use thiserror::Error;

pub use crate::transport::{TransportError, UrlEncodingError};

/// Message carried by every misconfiguration error raised when no usable
/// backend client can be built.
pub const MISCONFIGURED_MESSAGE: &str = "speech cloud client is not configured";

/// Message carried by [`Error::UnsupportedEncoding`].
pub const UNSUPPORTED_ENCODING_MESSAGE: &str =
    "Cannot create speech URL. Encoding is not supported.";

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or request field that caused the error (e.g., "endpoint", "voice.name")
    pub field_path: Option<String>,
    /// Additional context about the error
    pub details: Option<String>,
    /// Source of the error (e.g., "credentials", "config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the speech cloud facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("{message}")]
    UnsupportedEncoding {
        message: String,
        #[source]
        source: UrlEncodingError,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: HTTP {status} ({class}): {message}")]
    Remote {
        status: u16,
        class: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// The fixed-message error for a facade that has no usable backend.
    pub fn misconfigured(context: ErrorContext) -> Self {
        Self::configuration_with_context(MISCONFIGURED_MESSAGE, context)
    }

    pub fn unsupported_encoding(source: UrlEncodingError) -> Self {
        Error::UnsupportedEncoding {
            message: UNSUPPORTED_ENCODING_MESSAGE.to_string(),
            source,
        }
    }

    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, Error::Configuration { message, .. } if message == MISCONFIGURED_MESSAGE)
    }

    pub fn is_unsupported_encoding(&self) -> bool {
        matches!(self, Error::UnsupportedEncoding { .. })
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
