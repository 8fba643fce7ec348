//! Combining primitives
//!
//! A primitive turns a byte stream into a fixed-size value and combines a
//! directory's `(name, value)` children into one value. The engine is generic
//! over [`Primitive`], so the cryptographic and additive variants share a
//! single traversal.

pub mod aggregate;
pub mod primitive;
#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{combine, ChildEntry};
pub use primitive::{Algorithm, Blake3, Checksum, Primitive, Sha256};

use crate::error::FingerprintError;
use std::fs::File;
use std::path::Path;

/// Compute the leaf value of a regular file
///
/// The handle is opened here and dropped before returning on every path.
/// Any open or read failure is a `Read` error; a partial stream never
/// produces a value.
pub fn digest_file<P: Primitive + ?Sized>(
    primitive: &P,
    path: &Path,
) -> Result<P::Value, FingerprintError> {
    let read_error = |source| FingerprintError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_error)?;
    primitive.digest_reader(&mut file).map_err(read_error)
}
