//! Integration tests for the saved tree document

use crate::integration::test_utils::fixture;
use repotree::sink::{read_tree, JsonFileSink, TreeSink};
use repotree::source::{JsonFileSource, PathRecordSource};
use repotree::{build_hierarchy, FlatRecord, TreeNode};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

async fn fixture_tree() -> TreeNode {
    let records = JsonFileSource::new(fixture("listing.json"))
        .fetch_records()
        .await
        .unwrap();
    build_hierarchy(&records)
}

#[tokio::test]
async fn test_fixture_listing_totals() {
    let root = fixture_tree().await;

    assert_eq!(root.size(), 2481);
    assert_eq!(root.file_count(), 4);
    assert_eq!(root.directory_count(), 3);
    assert_eq!(root.find("src").unwrap().size(), 420);
    assert_eq!(root.find("src/tree").unwrap().size(), 300);
    assert_eq!(root.find("assets").unwrap().size(), 2048);
    assert_eq!(
        root.find("assets/logo.tar.gz").unwrap().extension(),
        Some("gz")
    );
    assert!(root.find("vendor").is_none());
}

#[tokio::test]
async fn test_saved_document_shape() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("public").join("tree.json");
    let root = fixture_tree().await;

    JsonFileSink::new(&path).store(&root).unwrap();
    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(value["name"], "/");
    assert_eq!(value["type"], "directory");
    assert_eq!(value["size"], 2481);
    assert_eq!(value["extension"], Value::Null);

    let readme = value["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|child| child["name"] == "README")
        .unwrap();
    assert_eq!(
        readme,
        &json!({"name": "README", "type": "file", "size": 13, "extension": null})
    );
    assert!(readme.get("children").is_none());
}

#[tokio::test]
async fn test_saved_document_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tree.json");
    let root = fixture_tree().await;

    let sink = JsonFileSink::new(&path).with_pretty(false);
    sink.store(&root).unwrap();
    assert_eq!(sink.describe(), path.display().to_string());

    let restored = read_tree(&path).unwrap();
    assert_eq!(restored, root);
}

#[test]
fn test_directory_children_keep_first_seen_order() {
    let root = build_hierarchy(&[
        FlatRecord::blob("zeta.txt", 1),
        FlatRecord::blob("alpha/a.txt", 1),
        FlatRecord::blob("mid.txt", 1),
    ]);
    let names: Vec<&str> = root
        .children()
        .unwrap()
        .iter()
        .map(|child| child.name.as_str())
        .collect();
    assert_eq!(names, vec!["zeta.txt", "alpha", "mid.txt"]);
}

#[test]
fn test_missing_document_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = read_tree(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, repotree::SinkError::Io(_)));
}
