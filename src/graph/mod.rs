//! Call-graph generation.
//!
//! Converts a normalized call tree into deduplicated nodes and weighted,
//! directed links for graph visualization.

pub mod callgraph;

// Re-export main types
pub use callgraph::{build_call_graph, build_call_graph_for, CallGraph, CallGraphLink, CallGraphNode};
