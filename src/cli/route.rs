//! CLI route: run context built from merged configuration; dispatches to the request loop.

use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, TracehashConfig};
use crate::digest::{Algorithm, Blake3, Checksum, Primitive, Sha256};
use crate::error::ApiError;
use crate::request::{run_paths, run_requests, RequestReport, RunSummary, Session};
use crate::trace::{RecordingTracer, SpanExporter};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Runtime context for CLI execution: effective configuration and requested paths.
pub struct RunContext {
    config: TracehashConfig,
    paths: Vec<PathBuf>,
}

impl RunContext {
    /// Load configuration for `workspace_root` and apply CLI overrides.
    pub fn new(cli: &Cli, workspace_root: &Path) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(workspace_root, cli.config.as_deref())?;
        let config = apply_overrides(config, cli);
        config.validate()?;
        Ok(Self {
            config,
            paths: cli.paths.clone(),
        })
    }

    /// Build directly from a configuration (tests and embedding).
    pub fn from_config(config: TracehashConfig, paths: Vec<PathBuf>) -> Self {
        Self { config, paths }
    }

    pub fn config(&self) -> &TracehashConfig {
        &self.config
    }

    /// Run every request, reading paths from `input` when none were given.
    pub fn execute<R: BufRead, W: Write, E: Write>(
        &self,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<RunSummary, ApiError> {
        info!(algorithm = %self.config.algorithm, "Starting requests");
        match self.config.algorithm {
            Algorithm::Sha256 => self.run_with(Sha256, input, out, err),
            Algorithm::Blake3 => self.run_with(Blake3, input, out, err),
            Algorithm::Checksum => self.run_with(Checksum, input, out, err),
        }
    }

    fn run_with<P: Primitive, R: BufRead, W: Write, E: Write>(
        &self,
        primitive: P,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<RunSummary, ApiError> {
        let tracer = RecordingTracer::new();
        let mut exporter = SpanExporter::from_config(&self.config.spans)?;
        let session = Session::new(primitive, &tracer, self.config.service.clone());

        let mut export_error = None;
        let flush = |_: &RequestReport| {
            let records = tracer.drain();
            if !exporter.is_enabled() || export_error.is_some() {
                return;
            }
            if let Err(e) = exporter.export(&records) {
                warn!(error = %e, "Span export failed");
                export_error = Some(e);
            }
        };

        let summary = if self.paths.is_empty() {
            run_requests(&session, input, out, err, flush)?
        } else {
            run_paths(&session, &self.paths, out, err, flush)?
        };

        if let Some(e) = export_error {
            return Err(e);
        }
        info!(
            requests = summary.requests,
            failures = summary.failures,
            "Requests finished"
        );
        Ok(summary)
    }
}

fn apply_overrides(mut config: TracehashConfig, cli: &Cli) -> TracehashConfig {
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(ref environment) = cli.environment {
        config.service.environment = environment.clone();
    }
    if let Some(ref spans_out) = cli.spans_out {
        config.spans.output = Some(spans_out.clone());
    }
    if cli.log_spans {
        config.spans.log = true;
    }
    config
}
