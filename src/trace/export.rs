//! Span export: JSON lines and structured log events

use crate::error::ApiError;
use crate::trace::SpanRecord;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Span export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanExportConfig {
    /// Append finished spans as JSON lines to this file
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Emit finished spans as debug events under `tracehash::spans`
    #[serde(default)]
    pub log: bool,
}

/// Writes drained span records to the configured destinations
pub struct SpanExporter {
    writer: Option<Box<dyn Write + Send>>,
    log: bool,
}

impl SpanExporter {
    pub fn from_config(config: &SpanExportConfig) -> Result<Self, ApiError> {
        let writer = match &config.output {
            Some(path) => Some(Box::new(BufWriter::new(open_append(path)?)) as Box<dyn Write + Send>),
            None => None,
        };
        Ok(Self {
            writer,
            log: config.log,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some() || self.log
    }

    pub fn export(&mut self, records: &[SpanRecord]) -> Result<(), ApiError> {
        if self.log {
            for record in records {
                log_record(record);
            }
        }
        if let Some(writer) = self.writer.as_mut() {
            write_json_lines(writer, records)?;
            writer.flush()?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File, ApiError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::Export(format!("Failed to open span output {:?}: {}", path, e)))
}

/// Write one JSON object per record, newline separated
pub fn write_json_lines<W: Write + ?Sized>(
    writer: &mut W,
    records: &[SpanRecord],
) -> Result<(), ApiError> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn log_record(record: &SpanRecord) {
    let tags = record
        .tags
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    debug!(
        target: "tracehash::spans",
        trace_id = record.trace_id,
        span_id = record.span_id,
        parent_id = record.parent_id,
        operation = %record.operation,
        duration_us = record.duration_us,
        tags = %tags,
        "Span finished"
    );
}
