//! Flatten a call tree into per-function aggregates.
//!
//! Two maps come out of one depth-first walk:
//! - function name -> summed metrics + one caller entry per occurrence
//! - caller -> callee -> summed metrics for that exact edge
//!
//! The profiler's per-node values are already inclusive of the subtree at
//! that occurrence. Summing every occurrence of a function therefore counts
//! time spent in shared descendants more than once. The aggregate answers
//! "where does time go overall"; it is not suitable for views that need
//! proper inclusion relationships, such as flame graphs.

use crate::parser::{CallTree, Metrics, ProfileNode};
use crate::utils::config::NO_PARENT;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed metrics for one function across the whole profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    #[serde(flatten)]
    pub metrics: Metrics,

    /// Caller at each occurrence, duplicates kept
    pub parents: Vec<String>,
}

/// caller -> callee -> summed metrics of that edge
pub type CallerIndex = BTreeMap<String, BTreeMap<String, Metrics>>;

/// Output of [`flatten_tree`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatProfile {
    /// Aggregate per canonical function name
    pub functions: BTreeMap<String, AggregateEntry>,

    /// Metrics per (caller, callee) pair; the root is filed under `NO_PARENT`
    pub callers: CallerIndex,
}

impl FlatProfile {
    pub fn get(&self, function: &str) -> Option<&AggregateEntry> {
        self.functions.get(function)
    }

    /// Callees of `caller` with the summed metrics of each edge
    pub fn callees(&self, caller: &str) -> Option<&BTreeMap<String, Metrics>> {
        self.callers.get(caller)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// Flatten a normalized call tree
///
/// **Public** - main entry point for aggregation
pub fn flatten_tree(tree: &CallTree) -> FlatProfile {
    let mut flat = FlatProfile::default();
    visit(tree.root(), NO_PARENT, &mut flat);

    debug!(
        "Flattened {} distinct functions across {} callers",
        flat.functions.len(),
        flat.callers.len()
    );

    flat
}

fn visit(node: &ProfileNode, parent: &str, flat: &mut FlatProfile) {
    let function = node.function.as_str();
    let values = node.metrics;

    match flat.functions.get_mut(function) {
        Some(entry) => {
            entry.metrics += &values;
            entry.parents.push(parent.to_string());
        }
        None => {
            flat.functions.insert(
                function.to_string(),
                AggregateEntry {
                    metrics: values,
                    parents: vec![parent.to_string()],
                },
            );
        }
    }

    let callees = flat.callers.entry(parent.to_string()).or_default();
    match callees.get_mut(function) {
        Some(metrics) => *metrics += &values,
        None => {
            callees.insert(function.to_string(), values);
        }
    }

    for child in &node.children {
        visit(child, function, flat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{MetricKey, ProfileNode};

    fn leaf(name: &str, wt: f64, ct: f64) -> ProfileNode {
        ProfileNode::new(name)
            .with_metric(MetricKey::Wt, wt)
            .with_metric(MetricKey::Ct, ct)
    }

    #[test]
    fn test_flatten_single_node() {
        let tree = CallTree::new(leaf("main", 10.0, 1.0));
        let flat = flatten_tree(&tree);

        assert_eq!(flat.function_count(), 1);
        let main = flat.get("main").unwrap();
        assert_eq!(main.metrics.wt, 10.0);
        assert_eq!(main.parents, vec![NO_PARENT.to_string()]);
        assert_eq!(flat.callees(NO_PARENT).unwrap()["main"].wt, 10.0);
    }

    #[test]
    fn test_flatten_sums_repeated_function() {
        let tree = CallTree::new(
            leaf("main", 100.0, 1.0)
                .with_child(leaf("a", 40.0, 1.0).with_child(leaf("log", 5.0, 2.0)))
                .with_child(leaf("log", 7.0, 1.0)),
        );
        let flat = flatten_tree(&tree);

        let log = flat.get("log").unwrap();
        assert_eq!(log.metrics.wt, 12.0);
        assert_eq!(log.metrics.ct, 3.0);
        let mut parents = log.parents.clone();
        parents.sort();
        assert_eq!(parents, vec!["a".to_string(), "main".to_string()]);

        assert_eq!(flat.callees("a").unwrap()["log"].wt, 5.0);
        assert_eq!(flat.callees("main").unwrap()["log"].wt, 7.0);
    }

    #[test]
    fn test_flatten_sums_repeated_edge() {
        let tree = CallTree::new(
            leaf("main", 100.0, 1.0)
                .with_child(leaf("query", 20.0, 1.0))
                .with_child(leaf("query", 30.0, 1.0)),
        );
        let flat = flatten_tree(&tree);

        assert_eq!(flat.get("query").unwrap().parents.len(), 2);
        assert_eq!(flat.callees("main").unwrap()["query"].wt, 50.0);
        assert_eq!(flat.callees("main").unwrap()["query"].ct, 2.0);
    }

    #[test]
    fn test_flatten_uses_canonical_names() {
        let tree = CallTree::new(
            leaf("main", 10.0, 1.0).with_child(leaf("get", 4.0, 1.0).with_owning_type("Cache")),
        );
        let flat = flatten_tree(&tree);

        assert!(flat.get("Cache::get").is_some());
        assert!(flat.get("get").is_none());
    }
}
