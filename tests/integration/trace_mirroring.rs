//! Integration tests for span structure mirroring the directory tree

use super::test_utils::{children_of, create_sample_tree, span_for};
use std::fs;
use tempfile::TempDir;
use tracehash::config::ServiceConfig;
use tracehash::digest::Sha256;
use tracehash::request::Session;
use tracehash::trace::{RecordingTracer, TagValue};
use tracehash::tree::Engine;

/// One span per file or directory, each parented by its filesystem parent
#[test]
fn test_one_span_per_node_with_parent_links() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_sample_tree(root);

    let tracer = RecordingTracer::new();
    Engine::new(&Sha256, &tracer).fingerprint(root, None).unwrap();
    let spans = tracer.spans();

    // 3 directories + 4 files
    assert_eq!(spans.len(), 7);

    let root_span = span_for(&spans, root);
    let nested = span_for(&spans, &root.join("nested"));
    let deeper = span_for(&spans, &root.join("nested").join("deeper"));

    assert_eq!(children_of(&spans, root_span).len(), 3);
    assert_eq!(children_of(&spans, nested).len(), 2);
    assert_eq!(children_of(&spans, deeper).len(), 1);
    assert_eq!(
        span_for(&spans, &root.join("nested").join("deeper").join("d.txt")).parent_id,
        Some(deeper.span_id)
    );
    assert!(spans.iter().all(|s| s.trace_id == root_span.trace_id));
}

/// Children finish before their parents
#[test]
fn test_children_finalized_before_parent() {
    let temp_dir = TempDir::new().unwrap();
    create_sample_tree(temp_dir.path());

    let tracer = RecordingTracer::new();
    Engine::new(&Sha256, &tracer)
        .fingerprint(temp_dir.path(), None)
        .unwrap();
    let spans = tracer.spans();

    for (index, span) in spans.iter().enumerate() {
        if let Some(parent_id) = span.parent_id {
            let parent_index = spans.iter().position(|s| s.span_id == parent_id).unwrap();
            assert!(index < parent_index, "{} finished after its parent", span.operation);
        }
    }
}

/// Directory spans carry entry count, included count and the rendered value
#[test]
fn test_directory_tags() {
    let temp_dir = TempDir::new().unwrap();
    create_sample_tree(temp_dir.path());

    let tracer = RecordingTracer::new();
    let value = Engine::new(&Sha256, &tracer)
        .fingerprint(temp_dir.path(), None)
        .unwrap();
    let spans = tracer.spans();
    let root_span = span_for(&spans, temp_dir.path());

    assert_eq!(root_span.operation, "sha256.directory");
    assert_eq!(root_span.tag("number_of_entries"), Some(&TagValue::Number(3)));
    assert_eq!(
        root_span.tag("number_of_children_included"),
        Some(&TagValue::Number(3))
    );
    assert_eq!(root_span.text_tag("sha256_hex"), Some(hex::encode(value).as_str()));
}

/// Requests get a root span; the tree hangs below it
#[test]
fn test_request_span_is_tree_root() {
    let temp_dir = TempDir::new().unwrap();
    create_sample_tree(temp_dir.path());

    let tracer = RecordingTracer::new();
    let service = ServiceConfig {
        name: "svc".to_string(),
        environment: "test".to_string(),
    };
    let session = Session::new(Sha256, &tracer, service);
    let report = session.handle(temp_dir.path());
    assert!(report.is_success());

    let spans = tracer.spans();
    assert_eq!(spans.len(), 8);
    let request = spans
        .iter()
        .find(|s| s.operation == "sha256.request")
        .unwrap();
    assert_eq!(request.parent_id, None);
    assert_eq!(request.text_tag("env"), Some("test"));
    assert_eq!(request.text_tag("service"), Some("svc"));
    assert_eq!(
        span_for(&spans, temp_dir.path()).parent_id,
        Some(request.span_id)
    );
}

/// Symlinked entries get no span and do not contribute
#[cfg(unix)]
#[test]
fn test_symlinked_entries_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("real.txt"), "real").unwrap();
    let outside = temp_dir.path().join("outside");
    fs::create_dir(&outside).unwrap();
    fs::write(outside.join("big.txt"), "outside data").unwrap();
    std::os::unix::fs::symlink(&outside, root.join("dir_link")).unwrap();
    std::os::unix::fs::symlink(root.join("real.txt"), root.join("file_link")).unwrap();
    // A cycle back to the root must not be followed either
    std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();

    let tracer = RecordingTracer::new();
    let with_links = Engine::new(&Sha256, &tracer).fingerprint(&root, None).unwrap();
    let spans = tracer.spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(
        span_for(&spans, &root).tag("number_of_entries"),
        Some(&TagValue::Number(1))
    );

    let plain = TempDir::new().unwrap();
    fs::write(plain.path().join("real.txt"), "real").unwrap();
    let without_links = Engine::new(&Sha256, &RecordingTracer::new())
        .fingerprint(plain.path(), None)
        .unwrap();
    assert_eq!(with_links, without_links);
}

/// A symlink given as the requested root is resolved
#[cfg(unix)]
#[test]
fn test_symlinked_root_is_resolved() {
    let temp_dir = TempDir::new().unwrap();
    let real = temp_dir.path().join("real");
    fs::create_dir(&real).unwrap();
    create_sample_tree(&real);
    let link = temp_dir.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let tracer = RecordingTracer::new();
    let engine = Engine::new(&Sha256, &tracer);
    assert_eq!(
        engine.fingerprint(&link, None).unwrap(),
        engine.fingerprint(&real, None).unwrap()
    );
}
