//! Filesystem tree traversal
//!
//! Walks a subtree depth-first, producing a deterministic value for it and a
//! span per visited node.

pub mod classify;
pub mod engine;

pub use classify::{classify, classify_root, read_children, ChildPath, Node, NodeKind};
pub use engine::Engine;

use crate::digest::{Algorithm, Blake3, Checksum, Primitive, Sha256};
use crate::error::FingerprintError;
use crate::trace::NoopTracer;
use std::path::Path;

/// Fingerprint `path` without tracing and return the rendered value
pub fn fingerprint_path(algorithm: Algorithm, path: &Path) -> Result<String, FingerprintError> {
    match algorithm {
        Algorithm::Sha256 => render_fingerprint(&Sha256, path),
        Algorithm::Blake3 => render_fingerprint(&Blake3, path),
        Algorithm::Checksum => render_fingerprint(&Checksum, path),
    }
}

fn render_fingerprint<P: Primitive>(primitive: &P, path: &Path) -> Result<String, FingerprintError> {
    let value = Engine::new(primitive, &NoopTracer).fingerprint(path, None)?;
    Ok(primitive.render(&value))
}
