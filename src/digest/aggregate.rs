//! Canonical aggregation of directory children
//!
//! Children are sorted by raw name bytes, then each child contributes its
//! name bytes immediately followed by its value bytes to a descriptor
//! buffer. The primitive applied to that buffer is the directory's value, so
//! the result never depends on the order the filesystem listed entries in.

use crate::digest::primitive::Primitive;
use std::ffi::{OsStr, OsString};

/// A successfully processed child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry<V> {
    pub name: OsString,
    pub value: V,
}

impl<V> ChildEntry<V> {
    pub fn new(name: impl Into<OsString>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Name bytes used both as sort key and descriptor content
    pub fn name_bytes(&self) -> &[u8] {
        name_bytes(&self.name)
    }
}

fn name_bytes(name: &OsStr) -> &[u8] {
    name.as_encoded_bytes()
}

/// Sort children by raw name bytes (total, locale-independent)
pub fn sort_canonical<V>(children: &mut [ChildEntry<V>]) {
    children.sort_by(|a, b| a.name_bytes().cmp(b.name_bytes()));
}

/// Build the descriptor buffer for children already in canonical order
pub fn descriptor<P: Primitive + ?Sized>(
    primitive: &P,
    children: &[ChildEntry<P::Value>],
) -> Vec<u8> {
    let mut buf = Vec::new();
    for child in children {
        buf.extend_from_slice(child.name_bytes());
        buf.extend_from_slice(&primitive.value_bytes(&child.value));
    }
    buf
}

/// Sort, lay out the descriptor and digest it
pub fn descriptor_digest<P: Primitive + ?Sized>(
    primitive: &P,
    children: &mut [ChildEntry<P::Value>],
) -> P::Value {
    sort_canonical(children);
    primitive.digest_bytes(&descriptor(primitive, children))
}

/// Combine a directory's children into one value
///
/// The slice is left sorted. An empty slice yields the primitive's value for
/// an empty descriptor.
pub fn combine<P: Primitive + ?Sized>(
    primitive: &P,
    children: &mut [ChildEntry<P::Value>],
) -> P::Value {
    primitive.combine(children)
}
