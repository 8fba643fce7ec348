//! Tracing capability
//!
//! The engine receives a [`Tracer`] by reference and opens one [`Span`] per
//! visited node. Spans finish when their handle is dropped, which happens at
//! the end of the call that opened them, so a child is always finalized
//! before its parent.

pub mod export;
pub mod recording;

pub use export::SpanExporter;
pub use recording::{RecordingTracer, SpanRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle naming a span that new spans may declare as their parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanContext {
    pub trace_id: u64,
    pub span_id: u64,
}

/// Tag value: text or number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Number(u64),
    Text(String),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Text(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Number(n) => write!(f, "{}", n),
            TagValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<u64> for TagValue {
    fn from(value: u64) -> Self {
        TagValue::Number(value)
    }
}

impl From<usize> for TagValue {
    fn from(value: usize) -> Self {
        TagValue::Number(value as u64)
    }
}

/// A single traced unit of work
pub trait Span {
    fn set_tag(&mut self, key: &str, value: TagValue);

    /// Context usable as parent for descendants
    fn context(&self) -> SpanContext;
}

/// Span factory injected into the engine
///
/// `Sync` so sibling subtrees can share one tracer if traversal is ever
/// parallelized.
pub trait Tracer: Sync {
    type Span: Span;

    /// Start a span; `None` parent starts a new trace
    fn start_span(&self, operation: &str, parent: Option<&SpanContext>) -> Self::Span;
}

impl<T: Tracer + ?Sized> Tracer for &T {
    type Span = T::Span;

    fn start_span(&self, operation: &str, parent: Option<&SpanContext>) -> Self::Span {
        (**self).start_span(operation, parent)
    }
}

/// Tracer that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

/// Span returned by [`NoopTracer`]
#[derive(Debug)]
pub struct NoopSpan {
    context: SpanContext,
}

impl Span for NoopSpan {
    fn set_tag(&mut self, _key: &str, _value: TagValue) {}

    fn context(&self) -> SpanContext {
        self.context
    }
}

impl Tracer for NoopTracer {
    type Span = NoopSpan;

    fn start_span(&self, _operation: &str, parent: Option<&SpanContext>) -> Self::Span {
        NoopSpan {
            context: parent.copied().unwrap_or(SpanContext {
                trace_id: 0,
                span_id: 0,
            }),
        }
    }
}
