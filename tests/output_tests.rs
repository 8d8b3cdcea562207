use calltree_studio::flamegraph::{build_flame_graph, flame_sort_order};
use calltree_studio::graph::build_call_graph;
use calltree_studio::output::{read_profile, read_json_file, validate_path, write_report, ViewReport};
use calltree_studio::parser::CallTree;
use calltree_studio::utils::config::SCHEMA_VERSION;
use calltree_studio::utils::error::OutputError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_profile_file(contents: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

fn sample_document() -> serde_json::Value {
    json!({
        "meta": {"url": "/checkout", "SERVER": {"REQUEST_TIME": 1700000000}},
        "profile": {
            "function": "main()", "ct": 1, "wt": 500, "cpu": 420,
            "children": [
                {"function": "handle", "cls": "Checkout", "ct": 1, "wt": 400, "cpu": 350,
                 "children": [{"function": "charge", "cls": "Gateway", "ct": 1, "wt": 300, "cpu": 10}]},
                {"function": "flush", "ct": 1, "wt": 2, "cpu": 1, "children": null}
            ]
        }
    })
}

#[test]
fn test_call_graph_report_round_trip() {
    let input = write_profile_file(&sample_document());
    let tree = CallTree::new(read_profile(input.path()).unwrap());
    let graph = build_call_graph(&tree, "cpu", 0.01).unwrap();

    let output = NamedTempFile::new().unwrap();
    let report = ViewReport::new("sample.json", Some(graph.metric), graph);
    write_report(&report, output.path()).unwrap();

    let loaded = read_json_file(output.path()).unwrap();
    assert_eq!(loaded["version"], SCHEMA_VERSION);
    assert_eq!(loaded["source"], "sample.json");
    assert_eq!(loaded["metric"], "cpu");
    assert_eq!(loaded["data"]["total"], 420.0);
    assert_eq!(
        loaded["data"]["links"],
        json!([
            {"source": "main()", "target": "Checkout::handle", "callCount": 1.0},
            {"source": "Checkout::handle", "target": "Gateway::charge", "callCount": 1.0}
        ])
    );
    assert!(loaded["generated_at"].as_str().unwrap().contains('T'));
}

#[test]
fn test_flame_graph_report_with_sort() {
    let input = write_profile_file(&sample_document());
    let tree = CallTree::new(read_profile(input.path()).unwrap());
    let flame = build_flame_graph(&tree, "wt", 0.01).unwrap();
    let sort = flame_sort_order(&flame);

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("reports/flame.json");
    write_report(&ViewReport::new("sample.json", None, flame).with_sort(sort), &path).unwrap();

    let loaded = read_json_file(&path).unwrap();
    assert_eq!(loaded["sort"], json!(["main()", "Checkout::handle", "Gateway::charge"]));
    assert_eq!(loaded["data"]["value"], 98.0);
    assert!(loaded["data"]["children"][0]["children"][0].get("children").is_none());
}

#[test]
fn test_read_profile_rejects_garbage() {
    let input = write_profile_file(&json!({"meta": {}}));
    assert!(matches!(read_profile(input.path()), Err(OutputError::Parse(_))));

    let mut not_json = NamedTempFile::new().unwrap();
    write!(not_json, "not json").unwrap();
    assert!(matches!(
        read_profile(not_json.path()),
        Err(OutputError::SerializationFailed(_))
    ));
}

#[test]
fn test_deep_profile_file_through_views() {
    let depth = 250;
    let mut text = r#"{"function": "leaf", "ct": 1, "wt": 1}"#.to_string();
    for level in (0..depth).rev() {
        text = format!(
            r#"{{"function": "f{}", "ct": 1, "wt": {}, "children": [{}]}}"#,
            level,
            depth - level + 1,
            text
        );
    }
    let mut input = NamedTempFile::new().unwrap();
    write!(input, r#"{{"profile": {}}}"#, text).unwrap();

    let tree = CallTree::new(read_profile(input.path()).unwrap());
    assert_eq!(tree.root().max_depth(), depth);

    let graph = build_call_graph(&tree, "wt", 0.0).unwrap();
    assert_eq!(graph.nodes.len(), depth + 1);
    assert_eq!(graph.links.len(), depth);

    let flame = build_flame_graph(&tree, "wt", 0.0).unwrap();
    assert_eq!(flame.max_depth(), depth);
    assert_eq!(flame_sort_order(&flame).len(), depth + 1);

    // The written report nests just as deep and must read back
    let output = NamedTempFile::new().unwrap();
    write_report(&ViewReport::new("deep.json", None, flame), output.path()).unwrap();
    let loaded = read_json_file(output.path()).unwrap();
    assert_eq!(loaded["data"]["name"], "f0");
}

#[test]
fn test_validate_output_path() {
    assert!(validate_path(Path::new("")).is_err());

    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
    assert!(validate_path(&temp_dir.path().join("fresh.json")).is_ok());
}
