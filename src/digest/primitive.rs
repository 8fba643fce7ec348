//! SHA-256, BLAKE3 and additive checksum primitives

use crate::digest::aggregate::{self, ChildEntry};
use crate::error::ApiError;
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::io::{self, Read};
use std::str::FromStr;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// A combining primitive: leaf values from byte streams, directory values
/// from canonicalized children
pub trait Primitive {
    /// Fixed-size value produced for every file and directory
    type Value: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// Short name used as span operation prefix and in messages (`sha256`)
    fn name(&self) -> &'static str;

    /// Span tag key under which rendered values are recorded
    fn value_tag(&self) -> &'static str;

    /// Stream the whole reader into the primitive
    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Self::Value>;

    /// Apply the primitive to an in-memory buffer
    fn digest_bytes(&self, bytes: &[u8]) -> Self::Value;

    /// Raw bytes of a value, as laid out in a directory descriptor
    fn value_bytes<'a>(&self, value: &'a Self::Value) -> Cow<'a, [u8]>;

    /// External representation (lowercase hex or decimal)
    fn render(&self, value: &Self::Value) -> String;

    /// Combine a directory's children into one value
    ///
    /// Default: sort by raw name bytes and digest the descriptor buffer.
    fn combine(&self, children: &mut [ChildEntry<Self::Value>]) -> Self::Value {
        aggregate::descriptor_digest(self, children)
    }
}

/// SHA-256 (32-byte values, hex rendering)
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl Primitive for Sha256 {
    type Value = [u8; 32];

    fn name(&self) -> &'static str {
        "sha256"
    }

    fn value_tag(&self) -> &'static str {
        "sha256_hex"
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Self::Value> {
        let mut hasher = sha2::Sha256::new();
        io::copy(reader, &mut hasher)?;
        Ok(hasher.finalize().into())
    }

    fn digest_bytes(&self, bytes: &[u8]) -> Self::Value {
        sha2::Sha256::digest(bytes).into()
    }

    fn value_bytes<'a>(&self, value: &'a Self::Value) -> Cow<'a, [u8]> {
        Cow::Borrowed(value.as_slice())
    }

    fn render(&self, value: &Self::Value) -> String {
        hex::encode(value)
    }
}

/// BLAKE3 (32-byte values, hex rendering)
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl Primitive for Blake3 {
    type Value = [u8; 32];

    fn name(&self) -> &'static str {
        "blake3"
    }

    fn value_tag(&self) -> &'static str {
        "blake3_hex"
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Self::Value> {
        let mut hasher = Hasher::new();
        io::copy(reader, &mut hasher)?;
        Ok(*hasher.finalize().as_bytes())
    }

    fn digest_bytes(&self, bytes: &[u8]) -> Self::Value {
        let mut hasher = Hasher::new();
        hasher.update(bytes);
        *hasher.finalize().as_bytes()
    }

    fn value_bytes<'a>(&self, value: &'a Self::Value) -> Cow<'a, [u8]> {
        Cow::Borrowed(value.as_slice())
    }

    fn render(&self, value: &Self::Value) -> String {
        hex::encode(value)
    }
}

/// Additive checksum: wrapping sum of all bytes modulo 2^64
///
/// A directory's value is the wrapping sum of its children's values, so the
/// root equals the sum over every included descendant file regardless of
/// tree shape. Names do not participate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksum;

fn sum_bytes(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
}

impl Primitive for Checksum {
    type Value = u64;

    fn name(&self) -> &'static str {
        "checksum"
    }

    fn value_tag(&self) -> &'static str {
        "checksum"
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Self::Value> {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let mut sum = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            sum = sum.wrapping_add(sum_bytes(&buf[..n]));
        }
        Ok(sum)
    }

    fn digest_bytes(&self, bytes: &[u8]) -> Self::Value {
        sum_bytes(bytes)
    }

    fn value_bytes<'a>(&self, value: &'a Self::Value) -> Cow<'a, [u8]> {
        Cow::Owned(value.to_be_bytes().to_vec())
    }

    fn render(&self, value: &Self::Value) -> String {
        value.to_string()
    }

    fn combine(&self, children: &mut [ChildEntry<Self::Value>]) -> Self::Value {
        aggregate::sort_canonical(children);
        children
            .iter()
            .fold(0u64, |acc, child| acc.wrapping_add(child.value))
    }
}

/// Runtime selection of a primitive (configuration and CLI)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Sha256,
    Blake3,
    Checksum,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha256 => Sha256.name(),
            Algorithm::Blake3 => Blake3.name(),
            Algorithm::Checksum => Checksum.name(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(Algorithm::Sha256),
            "blake3" => Ok(Algorithm::Blake3),
            "checksum" => Ok(Algorithm::Checksum),
            other => Err(ApiError::UnknownAlgorithm(other.to_string())),
        }
    }
}
