//! SHA-256 Verification Tests
//!
//! Pins exact rendered values so the descriptor layout (sorted children,
//! name bytes immediately followed by value bytes) cannot drift.

use sha2::{Digest, Sha256 as Reference};
use std::fs;
use tempfile::TempDir;
use tracehash::digest::{combine, ChildEntry, Primitive, Sha256};
use tracehash::trace::NoopTracer;
use tracehash::tree::Engine;

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[test]
fn test_empty_directory_is_hash_of_empty_buffer() {
    let temp_dir = TempDir::new().unwrap();
    let value = Engine::new(&Sha256, &NoopTracer)
        .fingerprint(temp_dir.path(), None)
        .unwrap();
    assert_eq!(Sha256.render(&value), EMPTY_SHA256);

    let mut none: Vec<ChildEntry<[u8; 32]>> = Vec::new();
    assert_eq!(Sha256.render(&combine(&Sha256, &mut none)), EMPTY_SHA256);
}

#[test]
fn test_directory_matches_reference_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b"), "second").unwrap();
    fs::write(temp_dir.path().join("a"), "first").unwrap();

    let a: [u8; 32] = Reference::digest(b"first").into();
    let b: [u8; 32] = Reference::digest(b"second").into();
    let mut descriptor = Vec::new();
    descriptor.extend_from_slice(b"a");
    descriptor.extend_from_slice(&a);
    descriptor.extend_from_slice(b"b");
    descriptor.extend_from_slice(&b);
    let expected = hex::encode(Reference::digest(&descriptor));

    let value = Engine::new(&Sha256, &NoopTracer)
        .fingerprint(temp_dir.path(), None)
        .unwrap();
    assert_eq!(Sha256.render(&value), expected);
}

#[test]
fn test_rendering_is_lowercase_fixed_length_hex() {
    let rendered = Sha256.render(&Sha256.digest_bytes(b"Hello, World!"));
    assert_eq!(rendered.len(), 64);
    assert!(rendered
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}
