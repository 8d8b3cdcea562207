//! Flame-graph generation.
//!
//! This module converts a normalized call tree into nested flame nodes.
//! Rendering is left to the consumer; only the data shape is produced here.

pub mod builder;

// Re-export main types
pub use builder::{build_flame_graph, build_flame_graph_for, flame_sort_order, FlameNode};
