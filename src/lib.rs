//! Tracehash: deterministic subtree fingerprints mirrored as trace spans
//!
//! Computes a content-derived value for a file or directory tree and opens
//! one span per visited file or directory, parented the way the tree is
//! nested. Directory values are canonical: children are sorted by raw name
//! bytes before aggregation, so enumeration order never matters.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod request;
pub mod trace;
pub mod tree;
