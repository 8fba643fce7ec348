//! Recursive fingerprinting engine
//!
//! Classifies a node, valuates it (file) or recurses and aggregates (directory),
//! and opens exactly one span per visited file or directory, parented by the
//! span of its filesystem parent.
//!
//! Failures are contained at the node where they occur: a failed child is left
//! out of its directory's aggregate and the directory still succeeds. Only the
//! literal root passed to [`Engine::fingerprint`] reports its error upward.

use crate::digest::{self, combine, ChildEntry, Primitive};
use crate::error::FingerprintError;
use crate::trace::{Span, SpanContext, Tracer};
use crate::tree::classify::{self, Node, NodeKind};
use std::path::Path;
use tracing::{debug, instrument, trace, warn};

/// Depth-first engine over a primitive and an injected tracer
pub struct Engine<'a, P: ?Sized, T> {
    primitive: &'a P,
    tracer: &'a T,
}

impl<'a, P, T> Engine<'a, P, T>
where
    P: Primitive + ?Sized,
    T: Tracer,
{
    pub fn new(primitive: &'a P, tracer: &'a T) -> Self {
        Self { primitive, tracer }
    }

    /// Fingerprint a requested root
    ///
    /// The root itself may be reached through a symlink; nothing below it is.
    #[instrument(skip(self, parent), fields(path = %path.display(), algorithm = self.primitive.name()))]
    pub fn fingerprint(
        &self,
        path: &Path,
        parent: Option<&SpanContext>,
    ) -> Result<P::Value, FingerprintError> {
        let node = classify::classify_root(path)?;
        self.visit_node(&node, parent)
    }

    /// Visit one node below `parent`
    ///
    /// Returns without opening a span when the path is gone or is not a
    /// regular file or directory.
    pub fn visit(
        &self,
        path: &Path,
        parent: Option<&SpanContext>,
    ) -> Result<P::Value, FingerprintError> {
        let node = classify::classify(path)?;
        self.visit_node(&node, parent)
    }

    fn visit_node(
        &self,
        node: &Node,
        parent: Option<&SpanContext>,
    ) -> Result<P::Value, FingerprintError> {
        match node.kind {
            NodeKind::File => self.visit_file(node, parent),
            NodeKind::Directory => self.visit_directory(node, parent),
            NodeKind::Other => Err(FingerprintError::UnsupportedKind(node.path.clone())),
        }
    }

    fn visit_file(
        &self,
        node: &Node,
        parent: Option<&SpanContext>,
    ) -> Result<P::Value, FingerprintError> {
        let mut span = self.tracer.start_span(&self.operation("file"), parent);
        span.set_tag("path", node.path.display().to_string().into());
        span.set_tag("file_name", display_name(&node.path).into());
        span.set_tag("file_size_bytes", node.size.into());

        match digest::digest_file(self.primitive, &node.path) {
            Ok(value) => {
                let rendered = self.primitive.render(&value);
                trace!(path = %node.path.display(), value = %rendered, "Valuated file");
                span.set_tag(self.primitive.value_tag(), rendered.into());
                Ok(value)
            }
            Err(err) => {
                warn!(path = %node.path.display(), error = %err, "Unable to valuate file");
                span.set_tag("error", self.hash_error_message().into());
                Err(err)
            }
        }
    }

    fn visit_directory(
        &self,
        node: &Node,
        parent: Option<&SpanContext>,
    ) -> Result<P::Value, FingerprintError> {
        let mut span = self.tracer.start_span(&self.operation("directory"), parent);
        span.set_tag("path", node.path.display().to_string().into());
        span.set_tag("directory_name", display_name(&node.path).into());

        let entries = match classify::read_children(&node.path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %node.path.display(), error = %err, "Unable to enumerate directory");
                span.set_tag("error", "Unable to enumerate directory.".into());
                return Err(err);
            }
        };
        span.set_tag("number_of_entries", entries.len().into());

        let context = span.context();
        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.visit(&entry.path, Some(&context)) {
                Ok(value) => children.push(ChildEntry::new(entry.name, value)),
                Err(err) => debug!(
                    path = %entry.path.display(),
                    reason = err.kind_name(),
                    "Excluding child from aggregate"
                ),
            }
        }

        span.set_tag("number_of_children_included", children.len().into());
        let value = combine(self.primitive, &mut children);
        let rendered = self.primitive.render(&value);
        debug!(
            path = %node.path.display(),
            included = children.len(),
            value = %rendered,
            "Aggregated directory"
        );
        span.set_tag(self.primitive.value_tag(), rendered.into());
        Ok(value)
    }

    fn operation(&self, kind: &str) -> String {
        format!("{}.{}", self.primitive.name(), kind)
    }

    fn hash_error_message(&self) -> String {
        format!("Unable to calculate {} hash.", self.primitive.name())
    }
}

fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
