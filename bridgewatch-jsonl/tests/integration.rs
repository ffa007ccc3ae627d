use bridgewatch::metrics::MetricServicePublisher;
use bridgewatch_jsonl::JsonlPublisher;

#[test]
fn writes_json_lines_in_call_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bridge-metrics.jsonl");
    let publisher = JsonlPublisher::new(&path);

    assert!(publisher.publish_numeric("conferences", 2).is_published());
    assert!(publisher.publish_string("channel_start", "198.51.100.7").is_published());
    assert!(publisher.publish_incremental("channels_expired", 1).is_published());

    let contents = std::fs::read_to_string(&path).expect("file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(r#""kind":"numeric""#));
    assert!(lines[1].contains("198.51.100.7"));
    assert!(lines[2].contains(r#""kind":"incremental""#));
}

#[test]
fn appends_to_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bridge-metrics.jsonl");

    let first = JsonlPublisher::new(&path);
    assert!(first.publish_numeric("conferences", 1).is_published());

    // A fresh publisher on the same path must not truncate.
    let second = JsonlPublisher::new(&path);
    assert!(second.publish_numeric("conferences", 2).is_published());

    let contents = std::fs::read_to_string(&path).expect("file");
    assert_eq!(contents.lines().count(), 2);
}
