//! Aggregation of call trees into per-function data.
//!
//! This module transforms a normalized call tree into:
//! - Per-function aggregates with their caller lists
//! - A caller index keyed by (caller, callee)
//! - Top-function rankings, dimension breakdowns and relatives lookups

pub mod flatten;
pub mod metrics;

// Re-export main types and functions
pub use flatten::{flatten_tree, AggregateEntry, CallerIndex, FlatProfile};
pub use metrics::{
    extract_dimension, relatives, top_functions, DimensionSlice, FunctionCost, Relative, Relatives,
};
