//! Selector resolution: turns zero, one or many optional selectors into exactly one.

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::types::{GetLexiconRequest, ListVoicesRequest};

/// A request object that narrows a listing or fetch. `Default` is the empty selector.
pub trait Selector: Default {
    const KIND: &'static str;
}

impl Selector for ListVoicesRequest {
    const KIND: &'static str = "ListVoicesRequest";
}

impl Selector for GetLexiconRequest {
    const KIND: &'static str = "GetLexiconRequest";
}

/// Resolve `selectors` to a single value.
///
/// - none: `T::default()`
/// - one: returned unchanged
/// - several: the first; the rest are dropped and a warning event is emitted
pub fn resolve_selector<T, I>(selectors: I, sink: &dyn DiagnosticSink) -> T
where
    T: Selector,
    I: IntoIterator<Item = T>,
{
    let mut iter = selectors.into_iter();
    match iter.next() {
        None => {
            sink.emit(DiagnosticEvent::SelectorDefaulted { selector: T::KIND });
            T::default()
        }
        Some(first) => {
            let ignored = iter.count();
            if ignored > 0 {
                sink.emit(DiagnosticEvent::ExtraSelectorsIgnored {
                    selector: T::KIND,
                    ignored,
                });
            }
            first
        }
    }
}
