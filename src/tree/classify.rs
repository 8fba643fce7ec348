//! Node classification and directory enumeration

use crate::error::FingerprintError;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Kind of a filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    /// Sockets, devices, fifos and symbolic links; never aggregated
    Other,
}

/// A classified filesystem node
#[derive(Debug, Clone)]
pub struct Node {
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Size in bytes for regular files, 0 otherwise
    pub size: u64,
}

/// A candidate child found while enumerating a directory
#[derive(Debug, Clone)]
pub struct ChildPath {
    pub name: OsString,
    pub path: PathBuf,
}

/// Classify `path` without following symbolic links
///
/// A symlink classifies as `Other`. A path that vanished since it was listed
/// is `PathNotFound`.
pub fn classify(path: &Path) -> Result<Node, FingerprintError> {
    from_metadata(path, fs::symlink_metadata(path))
}

/// Classify the literal requested root, resolving it if it is a symlink
pub fn classify_root(path: &Path) -> Result<Node, FingerprintError> {
    from_metadata(path, fs::metadata(path))
}

fn from_metadata(path: &Path, metadata: io::Result<Metadata>) -> Result<Node, FingerprintError> {
    let metadata = match metadata {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FingerprintError::PathNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(FingerprintError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let file_type = metadata.file_type();
    let (kind, size) = if file_type.is_symlink() {
        (NodeKind::Other, 0)
    } else if file_type.is_file() {
        (NodeKind::File, metadata.len())
    } else if file_type.is_dir() {
        (NodeKind::Directory, 0)
    } else {
        (NodeKind::Other, 0)
    };

    Ok(Node {
        path: path.to_path_buf(),
        kind,
        size,
    })
}

/// List the immediate children of `dir` that may be traversed
///
/// Symlinked entries are dropped here, checked on the entry itself. Entries
/// that fail mid-iteration are skipped; only failing to open the listing is
/// an error.
pub fn read_children(dir: &Path) -> Result<Vec<ChildPath>, FingerprintError> {
    let listing = fs::read_dir(dir).map_err(|source| FingerprintError::Enumeration {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut children = Vec::new();
    for entry in listing {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(directory = %dir.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let child_path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_symlink() => {
                debug!(path = %child_path.display(), "Skipping symlink");
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %child_path.display(), error = %e, "Skipping entry with unknown type");
                continue;
            }
        }

        children.push(ChildPath {
            name: entry.file_name(),
            path: child_path,
        });
    }

    Ok(children)
}
