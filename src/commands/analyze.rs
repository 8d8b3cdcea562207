//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the raw profile
//! 2. Normalizes function names
//! 3. Builds the requested view
//! 4. Writes the report (file or stdout)
//! 5. Optionally prints a top-functions summary

use super::models::{AnalyzeArgs, View};
use crate::aggregator::{flatten_tree, top_functions};
use crate::flamegraph::{build_flame_graph, flame_sort_order};
use crate::graph::build_call_graph;
use crate::output::{generate_text_summary, read_profile, report_to_string, write_report, ViewReport};
use crate::parser::{CallTree, MetricKey};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed profile
/// * Unknown metric
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();
    let source = args.input.display().to_string();

    info!("Analyzing profile: {} (view: {})", source, args.view);

    // Step 1: Read profile
    info!("Step 1/4: Reading profile...");
    let raw = read_profile(&args.input)
        .with_context(|| format!("Failed to read profile {}", source))?;

    // Step 2: Normalize names
    info!("Step 2/4: Normalizing function names...");
    let tree = CallTree::new(raw);

    // Step 3 + 4: Build the view and write it
    info!("Step 3/4: Building {} view...", args.view);
    match args.view {
        View::Flatten => {
            let flat = flatten_tree(&tree);
            debug!("Flattened {} functions", flat.function_count());
            emit(&args, ViewReport::new(&source, None, flat))?;
        }
        View::Callgraph => {
            let graph = build_call_graph(&tree, &args.metric, args.threshold)
                .context("Failed to build call graph")?;
            debug!("Call graph: {} nodes, {} links", graph.nodes.len(), graph.links.len());
            emit(&args, ViewReport::new(&source, Some(graph.metric), graph))?;
        }
        View::Flamegraph => {
            let flame = build_flame_graph(&tree, &args.metric, args.threshold)
                .context("Failed to build flame graph")?;
            let metric: MetricKey = args.metric.parse()?;
            let mut report = ViewReport::new(&source, Some(metric), flame);
            if args.with_sort {
                let sort = flame_sort_order(&report.data);
                report = report.with_sort(sort);
            }
            emit(&args, report)?;
        }
    }

    // Step 5: Print text summary (if requested)
    if args.print_summary {
        let metric: MetricKey = args.metric.parse()?;
        let flat = flatten_tree(&tree);
        let total = tree.root().metric(metric);
        let top = top_functions(&flat, total, metric, args.top);

        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Profile:   {}", source);
        println!("Root:      {}", tree.root().function);
        println!("Total {}:  {}", metric, total);
        println!("Calls:     {}", tree.root().node_count());
        println!("Functions: {}", flat.function_count());
        println!("\n{}", generate_text_summary(&top, metric, flat.function_count()));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Write the report to the output file, or stdout when none is given
///
/// **Private** - internal helper for execute_analyze
fn emit<T: Serialize>(args: &AnalyzeArgs, report: ViewReport<T>) -> Result<()> {
    info!("Step 4/4: Writing report...");
    match &args.output {
        Some(path) => {
            write_report(&report, path).context("Failed to write report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => {
            println!("{}", report_to_string(&report).context("Failed to serialize report")?);
        }
    }
    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    args.metric
        .parse::<MetricKey>()
        .with_context(|| format!("Cannot build a {} view", args.view))?;

    validate_threshold(args.threshold)?;

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    Ok(())
}

/// Thresholds are shares of a total, so only `0.0..=1.0` makes sense (NaN is rejected)
pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("Threshold must be between 0 and 1 (got {})", threshold);
    }
    Ok(())
}
