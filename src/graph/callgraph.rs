//! Call-graph construction.
//!
//! Produces one node per distinct function and one directed link per
//! retained call occurrence, ready for graph visualization.
//!
//! Rules:
//! - A node is emitted the first time its function is reached; later
//!   occurrences never update it.
//! - A node's value is its own metric minus its direct children's, at that
//!   first occurrence. The subtraction is single-level only, so values can
//!   go negative when a child reports more than its share of the parent.
//! - A child is kept only while its metric is above `threshold` of the root
//!   total. Pruning drops the child's whole subtree.
//! - Links are never deduplicated.

use crate::parser::{CallTree, MetricKey, ProfileNode};
use crate::utils::error::AnalysisError;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// One function in the call graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphNode {
    pub name: String,
    /// `ct` of the first occurrence, as reported
    pub call_count: f64,
    pub value: f64,
}

/// One retained call from `source` to `target`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphLink {
    pub source: String,
    pub target: String,
    /// `ct` of the child occurrence, as reported
    pub call_count: f64,
}

/// Call-graph view of one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallGraph {
    pub metric: MetricKey,
    pub total: f64,
    pub nodes: Vec<CallGraphNode>,
    pub links: Vec<CallGraphLink>,
}

/// Build a call graph, validating the metric name first
///
/// **Public** - main entry point for call-graph generation
///
/// # Errors
/// * `AnalysisError::InvalidMetric` - `metric` is not a recognized key;
///   no traversal happens in that case
pub fn build_call_graph(
    tree: &CallTree,
    metric: &str,
    threshold: f64,
) -> Result<CallGraph, AnalysisError> {
    let metric: MetricKey = metric.parse()?;
    Ok(build_call_graph_for(tree, metric, threshold))
}

/// Build a call graph for an already-validated metric
pub fn build_call_graph_for(tree: &CallTree, metric: MetricKey, threshold: f64) -> CallGraph {
    let root = tree.root();
    let total = root.metric(metric);

    let mut builder = CallGraphWalk {
        metric,
        total,
        threshold,
        emitted: HashSet::new(),
        nodes: Vec::new(),
        links: Vec::new(),
    };
    builder.visit(root);

    debug!(
        "Call graph for {}: {} nodes, {} links (total {}, threshold {})",
        metric,
        builder.nodes.len(),
        builder.links.len(),
        total,
        threshold
    );

    CallGraph {
        metric,
        total,
        nodes: builder.nodes,
        links: builder.links,
    }
}

/// Working set for a single traversal, dropped when the build returns
struct CallGraphWalk<'a> {
    metric: MetricKey,
    total: f64,
    threshold: f64,
    emitted: HashSet<&'a str>,
    nodes: Vec<CallGraphNode>,
    links: Vec<CallGraphLink>,
}

impl<'a> CallGraphWalk<'a> {
    fn visit(&mut self, node: &'a ProfileNode) {
        if self.emitted.insert(node.function.as_str()) {
            self.nodes.push(CallGraphNode {
                name: node.function.clone(),
                call_count: node.metrics.ct,
                value: node.self_value(self.metric),
            });
        }

        for child in &node.children {
            if !exceeds_threshold(child.metric(self.metric), self.total, self.threshold) {
                continue;
            }
            self.links.push(CallGraphLink {
                source: node.function.clone(),
                target: child.function.clone(),
                call_count: child.metrics.ct,
            });
            self.visit(child);
        }
    }
}

/// Whether a child's share of the root total is above `threshold`
///
/// A zero total makes the share undefined, so nothing is retained.
pub(crate) fn exceeds_threshold(value: f64, total: f64, threshold: f64) -> bool {
    total != 0.0 && value / total > threshold
}
