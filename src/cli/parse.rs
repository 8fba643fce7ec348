//! CLI parse: clap types for tracehash. No behavior; definitions only.

use crate::digest::Algorithm;
use clap::Parser;
use std::path::PathBuf;

/// Tracehash CLI - deterministic file and directory fingerprints with per-node trace spans
///
/// With no PATHS, reads one path per line from stdin until EOF.
#[derive(Parser, Debug)]
#[command(name = "tracehash")]
#[command(about = "Fingerprint files and directories, emitting one trace span per node")]
pub struct Cli {
    /// Paths to fingerprint; prompts on stdin when omitted
    pub paths: Vec<PathBuf>,

    /// Combining primitive
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Configuration file path (layered over default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment tag for request spans
    #[arg(long)]
    pub environment: Option<String>,

    /// Append finished spans as JSON lines to this file
    #[arg(long)]
    pub spans_out: Option<PathBuf>,

    /// Emit finished spans as debug log events
    #[arg(long)]
    pub log_spans: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
