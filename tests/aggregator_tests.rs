use calltree_studio::aggregator::{extract_dimension, flatten_tree, relatives, top_functions};
use calltree_studio::parser::{parse_profile, CallTree, MetricKey, Metrics, ProfileNode};
use calltree_studio::utils::config::NO_PARENT;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_tree() -> CallTree {
    let raw = json!({
        "function": "main()", "ct": 1, "wt": 1000, "cpu": 800, "mu": 4096, "pmu": 8192,
        "children": [
            {"function": "dispatch", "cls": "Router", "ct": 1, "wt": 700, "cpu": 600, "mu": 2048, "pmu": 4096,
             "children": [
                {"function": "get", "cls": "Cache", "ct": 3, "wt": 120, "cpu": 100, "mu": 512, "pmu": 1024},
                {"function": "query", "cls": "Db", "ct": 2, "wt": 400, "cpu": 200, "mu": 1024, "pmu": 2048,
                 "children": [
                    {"function": "get", "cls": "Cache", "ct": 1, "wt": 30, "cpu": 25, "mu": 64, "pmu": 128}
                 ]}
             ]},
            {"function": "get", "cls": "Cache", "ct": 2, "wt": 50, "cpu": 40, "mu": 128, "pmu": 256}
        ]
    });
    CallTree::new(parse_profile(raw).unwrap())
}

/// Every occurrence of `name`, paired with its caller
fn occurrences<'a>(node: &'a ProfileNode, parent: &'a str, name: &str, out: &mut Vec<(&'a str, &'a Metrics)>) {
    if node.function == name {
        out.push((parent, &node.metrics));
    }
    for child in &node.children {
        occurrences(child, &node.function, name, out);
    }
}

#[test]
fn test_aggregate_conservation() {
    let tree = sample_tree();
    let flat = flatten_tree(&tree);

    for name in ["main()", "Router::dispatch", "Cache::get", "Db::query"] {
        let mut found = Vec::new();
        occurrences(tree.root(), NO_PARENT, name, &mut found);

        let entry = flat.get(name).unwrap();
        assert_eq!(entry.parents.len(), found.len(), "function = {}", name);

        for key in MetricKey::ALL {
            let expected: f64 = found.iter().map(|(_, m)| m.get(key)).sum();
            assert_eq!(entry.metrics.get(key), expected, "{} / {}", name, key);
        }

        let mut expected_parents: Vec<&str> = found.iter().map(|(p, _)| *p).collect();
        let mut parents: Vec<&str> = entry.parents.iter().map(String::as_str).collect();
        expected_parents.sort();
        parents.sort();
        assert_eq!(parents, expected_parents);
    }
}

#[test]
fn test_caller_index_conservation() {
    let flat = flatten_tree(&sample_tree());

    assert_eq!(flat.callees(NO_PARENT).unwrap()["main()"].wt, 1000.0);
    assert_eq!(flat.callees("Router::dispatch").unwrap()["Cache::get"].wt, 120.0);
    assert_eq!(flat.callees("Db::query").unwrap()["Cache::get"].wt, 30.0);
    assert_eq!(flat.callees("main()").unwrap()["Cache::get"].ct, 2.0);

    // Every (caller, callee) total must add up to the callee's aggregate
    for (name, entry) in &flat.functions {
        let from_index: f64 = flat
            .callers
            .values()
            .filter_map(|callees| callees.get(name))
            .map(|m| m.wt)
            .sum();
        assert_eq!(from_index, entry.metrics.wt, "function = {}", name);
    }
}

#[test]
fn test_double_counting_is_preserved() {
    let flat = flatten_tree(&sample_tree());

    // Db::query's 400 already includes its nested Cache::get (30); the
    // aggregate still sums both occurrences of Cache::get independently.
    assert_eq!(flat.get("Cache::get").unwrap().metrics.wt, 200.0);
    assert_eq!(flat.get("Cache::get").unwrap().metrics.ct, 6.0);
}

#[test]
fn test_top_functions_by_cpu() {
    let tree = sample_tree();
    let flat = flatten_tree(&tree);
    let top = top_functions(&flat, tree.root().metric(MetricKey::Cpu), MetricKey::Cpu, 2);

    let names: Vec<&str> = top.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["main()", "Router::dispatch"]);
    assert_eq!(top[1].percentage, 75.0);
}

#[test]
fn test_extract_dimension_memory() {
    let flat = flatten_tree(&sample_tree());
    let slices = extract_dimension(&flat, MetricKey::Mu, 1);

    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].name, "main()");
    assert_eq!(slices[1].value, 2048.0 + 704.0 + 1024.0);
}

#[test]
fn test_relatives_of_shared_function() {
    let flat = flatten_tree(&sample_tree());
    let rel = relatives(&flat, "Cache::get", "wt", 0.01).unwrap().unwrap();

    let parents: Vec<&str> = rel.parents.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(parents, vec!["Router::dispatch", "Db::query", "main()"]);
    assert!(rel.children.is_empty());
}
