//! Relatives command: callers and callees of one function.

use super::analyze::validate_threshold;
use super::models::RelativesArgs;
use crate::aggregator::{flatten_tree, relatives};
use crate::output::read_profile;
use crate::parser::{CallTree, MetricKey};
use anyhow::{Context, Result};
use log::info;

/// Print the relatives of `args.function` as JSON
pub fn execute_relatives(args: RelativesArgs) -> Result<()> {
    info!("Looking up relatives of '{}'", args.function);

    let raw = read_profile(&args.input)
        .with_context(|| format!("Failed to read profile {}", args.input.display()))?;
    let flat = flatten_tree(&CallTree::new(raw));

    let found = relatives(&flat, &args.function, &args.metric, args.threshold)
        .context("Failed to look up relatives")?
        .with_context(|| format!("Function '{}' not found in profile", args.function))?;

    info!(
        "'{}': {} callers, {} callees",
        found.function,
        found.parents.len(),
        found.children.len()
    );

    println!("{}", serde_json::to_string_pretty(&found)?);

    Ok(())
}

/// Validate relatives arguments
///
/// **Public** - can be called before execute_relatives for early validation
pub fn validate_relatives_args(args: &RelativesArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.function.trim().is_empty() {
        anyhow::bail!("Function name cannot be empty");
    }

    args.metric
        .parse::<MetricKey>()
        .context("Cannot look up relatives")?;

    validate_threshold(args.threshold)
}
