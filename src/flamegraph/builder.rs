//! Flame-graph construction.
//!
//! Every retained call occurrence becomes its own nested node, so the same
//! function can show up at several positions. Values and pruning follow the
//! call-graph rules: single-level self value, children kept only above
//! `threshold` of the root total.

use crate::graph::callgraph::exceeds_threshold;
use crate::parser::{CallTree, MetricKey, ProfileNode};
use crate::utils::error::AnalysisError;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// One call occurrence in the flame graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlameNode {
    pub name: String,
    pub value: f64,

    /// Retained children; `None` when there are none to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FlameNode>>,
}

impl FlameNode {
    pub fn children(&self) -> &[FlameNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(FlameNode::node_count).sum::<usize>()
    }

    /// Deepest nesting level below this node (0 for a leaf)
    pub fn max_depth(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Build a flame graph, validating the metric name first
///
/// **Public** - main entry point for flame-graph generation
///
/// # Errors
/// * `AnalysisError::InvalidMetric` - `metric` is not a recognized key;
///   no traversal happens in that case
pub fn build_flame_graph(
    tree: &CallTree,
    metric: &str,
    threshold: f64,
) -> Result<FlameNode, AnalysisError> {
    let metric: MetricKey = metric.parse()?;
    Ok(build_flame_graph_for(tree, metric, threshold))
}

/// Build a flame graph for an already-validated metric
pub fn build_flame_graph_for(tree: &CallTree, metric: MetricKey, threshold: f64) -> FlameNode {
    let root = tree.root();
    let total = root.metric(metric);
    let flame = flame_node(root, metric, total, threshold);

    debug!(
        "Flame graph for {}: {} nodes, depth {} (total {}, threshold {})",
        metric,
        flame.node_count(),
        flame.max_depth(),
        total,
        threshold
    );

    flame
}

fn flame_node(node: &ProfileNode, metric: MetricKey, total: f64, threshold: f64) -> FlameNode {
    let children: Vec<FlameNode> = node
        .children
        .iter()
        .filter(|child| exceeds_threshold(child.metric(metric), total, threshold))
        .map(|child| flame_node(child, metric, total, threshold))
        .collect();

    FlameNode {
        name: node.function.clone(),
        value: node.self_value(metric),
        children: (!children.is_empty()).then_some(children),
    }
}

/// Distinct function names of a flame graph, in depth-first first-visit order
///
/// Companion ordering for consumers that want a stable name list next to the
/// flame structure. Computed from the pruned flame tree only.
pub fn flame_sort_order(root: &FlameNode) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if seen.insert(node.name.as_str()) {
            order.push(node.name.clone());
        }
        stack.extend(node.children().iter().rev());
    }

    order
}
