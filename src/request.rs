//! Request handling
//!
//! Each request is one path. A root request span is opened per request and
//! the engine hangs the tree's spans below it. One request's failure never
//! affects the next.

use crate::config::ServiceConfig;
use crate::digest::Primitive;
use crate::error::FingerprintError;
use crate::trace::{Span, Tracer};
use crate::tree::Engine;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Interactive prompt
pub const PROMPT: &str = "enter a file or directory (ctrl+d to quit): ";

/// Result of one request
#[derive(Debug)]
pub struct RequestReport {
    pub path: PathBuf,
    /// Rendered value on success
    pub outcome: Result<String, FingerprintError>,
}

impl RequestReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Totals for a run of requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: usize,
    pub failures: usize,
}

/// Request handler owning a primitive and a tracer
pub struct Session<P, T> {
    primitive: P,
    tracer: T,
    service: ServiceConfig,
}

impl<P: Primitive, T: Tracer> Session<P, T> {
    pub fn new(primitive: P, tracer: T, service: ServiceConfig) -> Self {
        Self {
            primitive,
            tracer,
            service,
        }
    }

    /// Handle one request for `path`
    pub fn handle(&self, path: &Path) -> RequestReport {
        let start = Instant::now();
        let name = self.primitive.name();

        let mut root = self.tracer.start_span(&format!("{}.request", name), None);
        root.set_tag("env", self.service.environment.clone().into());
        root.set_tag("service", self.service.name.clone().into());
        root.set_tag("path", path.display().to_string().into());

        if !path.exists() {
            warn!(path = %path.display(), "Requested path does not exist");
            root.set_tag("error", "The file does not exist.".into());
            return RequestReport {
                path: path.to_path_buf(),
                outcome: Err(FingerprintError::PathNotFound(path.to_path_buf())),
            };
        }
        if let Ok(resolved) = dunce::canonicalize(path) {
            root.set_tag("resolved_path", resolved.display().to_string().into());
        }

        let engine = Engine::new(&self.primitive, &self.tracer);
        let outcome = match engine.fingerprint(path, Some(&root.context())) {
            Ok(value) => {
                let rendered = self.primitive.render(&value);
                root.set_tag(self.primitive.value_tag(), rendered.clone().into());
                Ok(rendered)
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    failed_node = %err.path().display(),
                    error = %err,
                    "Request failed"
                );
                root.set_tag("error", format!("Unable to calculate {} hash.", name).into());
                Err(err)
            }
        };

        info!(
            path = %path.display(),
            algorithm = name,
            ok = outcome.is_ok(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        RequestReport {
            path: path.to_path_buf(),
            outcome,
        }
    }
}

/// Write a report the way the interactive loop presents it
pub fn print_report<W: Write, E: Write>(
    name: &str,
    report: &RequestReport,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    let quoted = format!("\"{}\"", report.path.display());
    match &report.outcome {
        Ok(rendered) => writeln!(out, "{}({}): {}", name, quoted, rendered),
        Err(FingerprintError::PathNotFound(_)) => {
            writeln!(err, "The file {} does not exist.", quoted)
        }
        Err(_) => writeln!(err, "Unable to calculate the {} hash of {}.", name, quoted),
    }
}

/// Read one path per line until EOF, prompting before each
///
/// Lines are raw bytes, so any Unix path can be requested. Blank lines are
/// ignored. `on_complete` runs after every request, after its root span has
/// finished.
pub fn run_requests<P, T, R, W, E, F>(
    session: &Session<P, T>,
    mut input: R,
    out: &mut W,
    err: &mut E,
    mut on_complete: F,
) -> io::Result<RunSummary>
where
    P: Primitive,
    T: Tracer,
    R: BufRead,
    W: Write,
    E: Write,
    F: FnMut(&RequestReport),
{
    let mut summary = RunSummary::default();
    let mut buf = Vec::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = strip_line_ending(&buf);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let Some(path) = path_from_bytes(line) else {
            warn!(line = %String::from_utf8_lossy(line), "Input line is not a valid path");
            summary.requests += 1;
            summary.failures += 1;
            writeln!(
                err,
                "Unable to read the path \"{}\".",
                String::from_utf8_lossy(line)
            )?;
            continue;
        };
        let report = session.handle(&path);
        record(&mut summary, &report);
        print_report(session.primitive.name(), &report, out, err)?;
        on_complete(&report);
    }
    writeln!(out)?;
    Ok(summary)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Handle each path in order, without prompting
pub fn run_paths<P, T, W, E, F>(
    session: &Session<P, T>,
    paths: &[PathBuf],
    out: &mut W,
    err: &mut E,
    mut on_complete: F,
) -> io::Result<RunSummary>
where
    P: Primitive,
    T: Tracer,
    W: Write,
    E: Write,
    F: FnMut(&RequestReport),
{
    let mut summary = RunSummary::default();
    for path in paths {
        let report = session.handle(path);
        record(&mut summary, &report);
        print_report(session.primitive.name(), &report, out, err)?;
        on_complete(&report);
    }
    Ok(summary)
}

fn record(summary: &mut RunSummary, report: &RequestReport) {
    summary.requests += 1;
    if !report.is_success() {
        summary.failures += 1;
    }
}
