//! Calltree Studio
//!
//! Flat, call-graph and flame-graph views over hierarchical call profiles
//! (one root call, nested children, `ct/wt/cpu/mu/pmu` per node).
//!
//! This crate provides the core implementation for the `calltree` CLI tool.
//! Every view is a pure function of a normalized [`parser::CallTree`]:
//!
//! ```ignore
//! let tree = CallTree::new(read_profile("profile.json")?);
//! let flat = flatten_tree(&tree);
//! let graph = build_call_graph(&tree, "wt", 0.01)?;
//! let flame = build_flame_graph(&tree, "wt", 0.01)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod graph;
pub mod output;
pub mod parser;
pub mod utils;

pub use aggregator::{flatten_tree, FlatProfile};
pub use flamegraph::{build_flame_graph, FlameNode};
pub use graph::{build_call_graph, CallGraph};
pub use parser::{CallTree, MetricKey, ProfileNode};
pub use utils::error::AnalysisError;
