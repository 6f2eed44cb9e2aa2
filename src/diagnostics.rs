//! 诊断事件模块：通过注入的观察者输出参数解析等结构化诊断事件。
//!
//! Structured diagnostics emitted by the facade.
//!
//! Diagnostics go through an injected [`DiagnosticSink`] rather than a global
//! logger, so applications and tests can observe them directly.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`DiagnosticEvent`] | Typed diagnostic event |
//! | [`DiagnosticSink`] | Trait for diagnostic destinations |
//! | [`TracingDiagnosticSink`] | Default sink, forwards to `tracing` |
//! | [`NoopDiagnosticSink`] | Drops everything |
//! | [`InMemoryDiagnosticSink`] | Records events for testing |

use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// No selector was supplied; a default one was constructed.
    SelectorDefaulted { selector: &'static str },
    /// More than one selector was supplied; all but the first were dropped.
    ExtraSelectorsIgnored {
        selector: &'static str,
        ignored: usize,
    },
}

impl DiagnosticEvent {
    pub fn is_warning(&self) -> bool {
        matches!(self, DiagnosticEvent::ExtraSelectorsIgnored { .. })
    }
}

/// Destination for [`DiagnosticEvent`]s.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn emit(&self, _event: DiagnosticEvent) {}
}

pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn emit(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::SelectorDefaulted { selector } => {
                tracing::info!(selector, "no selector supplied, using a default one");
            }
            DiagnosticEvent::ExtraSelectorsIgnored { selector, ignored } => {
                tracing::warn!(
                    selector,
                    ignored,
                    "more than one selector supplied, using the first and ignoring the rest"
                );
            }
        }
    }
}

/// In-memory sink for testing.
#[derive(Default)]
pub struct InMemoryDiagnosticSink {
    events: RwLock<Vec<DiagnosticEvent>>,
}

impl InMemoryDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn warnings(&self) -> Vec<DiagnosticEvent> {
        self.events().into_iter().filter(|e| e.is_warning()).collect()
    }

    pub fn clear(&self) {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for InMemoryDiagnosticSink {
    fn emit(&self, event: DiagnosticEvent) {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

pub fn tracing_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(TracingDiagnosticSink)
}
