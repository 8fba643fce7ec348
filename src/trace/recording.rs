//! In-memory tracer
//!
//! Records every finished span with its tags and parent link. The binary
//! drains it after each request for export; tests assert on the records.

use crate::trace::{Span, SpanContext, TagValue, Tracer};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A finished span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRecord {
    pub trace_id: u64,
    pub span_id: u64,
    pub parent_id: Option<u64>,
    pub operation: String,
    pub tags: BTreeMap<String, TagValue>,
    pub started_at: DateTime<Utc>,
    pub duration_us: u64,
}

impl SpanRecord {
    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Text tag, or `None` if absent or numeric
    pub fn text_tag(&self, key: &str) -> Option<&str> {
        self.tag(key).and_then(TagValue::as_text)
    }

    pub fn context(&self) -> SpanContext {
        SpanContext {
            trace_id: self.trace_id,
            span_id: self.span_id,
        }
    }
}

#[derive(Debug)]
struct Inner {
    next_id: AtomicU64,
    finished: Mutex<Vec<SpanRecord>>,
}

/// Thread-safe recording tracer; clones share the same record buffer
#[derive(Debug, Clone)]
pub struct RecordingTracer {
    inner: Arc<Inner>,
}

impl Default for RecordingTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                finished: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of finished spans in completion order
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.inner.finished.lock().clone()
    }

    /// Take all finished spans, leaving the buffer empty
    pub fn drain(&self) -> Vec<SpanRecord> {
        std::mem::take(&mut *self.inner.finished.lock())
    }

    pub fn finished_count(&self) -> usize {
        self.inner.finished.lock().len()
    }
}

/// Live span handle; recorded on drop
#[derive(Debug)]
pub struct RecordedSpan {
    context: SpanContext,
    record: Option<SpanRecord>,
    started: Instant,
    inner: Arc<Inner>,
}

impl Span for RecordedSpan {
    fn set_tag(&mut self, key: &str, value: TagValue) {
        if let Some(record) = self.record.as_mut() {
            record.tags.insert(key.to_string(), value);
        }
    }

    fn context(&self) -> SpanContext {
        self.context
    }
}

impl Drop for RecordedSpan {
    fn drop(&mut self) {
        if let Some(mut record) = self.record.take() {
            record.duration_us = self.started.elapsed().as_micros() as u64;
            self.inner.finished.lock().push(record);
        }
    }
}

impl Tracer for RecordingTracer {
    type Span = RecordedSpan;

    fn start_span(&self, operation: &str, parent: Option<&SpanContext>) -> Self::Span {
        let span_id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let trace_id = parent.map(|p| p.trace_id).unwrap_or(span_id);
        RecordedSpan {
            context: SpanContext { trace_id, span_id },
            record: Some(SpanRecord {
                trace_id,
                span_id,
                parent_id: parent.map(|p| p.span_id),
                operation: operation.to_string(),
                tags: BTreeMap::new(),
                started_at: Utc::now(),
                duration_us: 0,
            }),
            started: Instant::now(),
            inner: Arc::clone(&self.inner),
        }
    }
}
