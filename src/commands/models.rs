use crate::utils::config::{DEFAULT_METRIC, DEFAULT_THRESHOLD, DEFAULT_TOP_FUNCTIONS};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Which analysis view to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Per-function aggregate plus caller index
    Flatten,
    /// Deduplicated nodes with weighted links
    Callgraph,
    /// Nested flame nodes
    Flamegraph,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Flatten => "flatten",
            View::Callgraph => "callgraph",
            View::Flamegraph => "flamegraph",
        };
        f.write_str(name)
    }
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Raw profile JSON file
    pub input: PathBuf,

    /// Output path for the JSON report (stdout when absent)
    pub output: Option<PathBuf>,

    /// View to build
    pub view: View,

    /// Metric key for graph views and the summary
    pub metric: String,

    /// Minimum share of the root total a child must exceed
    pub threshold: f64,

    /// Attach the flame-graph function ordering to the report
    pub with_sort: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of functions in the summary
    pub top: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("profile.json"),
            output: None,
            view: View::Callgraph,
            metric: DEFAULT_METRIC.to_string(),
            threshold: DEFAULT_THRESHOLD,
            with_sort: false,
            print_summary: false,
            top: DEFAULT_TOP_FUNCTIONS,
        }
    }
}

/// Arguments for the relatives command
#[derive(Debug, Clone)]
pub struct RelativesArgs {
    pub input: PathBuf,
    pub function: String,
    pub metric: String,
    pub threshold: f64,
}
