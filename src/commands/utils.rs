use crate::output::read_json_file;
use crate::parser::{parse_profile, validate_profile_format, CallTree, MetricKey};
use crate::utils::config::{NO_PARENT, PROFILE_FIELD_NAMES, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a raw profile JSON file
pub fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let raw = read_json_file(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    if !validate_profile_format(&raw) {
        anyhow::bail!(
            "Not a call profile: expected a root call or one nested under {}",
            PROFILE_FIELD_NAMES.join(", ")
        );
    }

    let tree = CallTree::new(parse_profile(raw)?);
    let root = tree.root();

    println!("✓ Valid profile JSON");
    println!("  Root:       {}", root.function);
    println!("  Calls:      {}", root.node_count());
    println!("  Max depth:  {}", root.max_depth());
    println!("  Wall time:  {}", root.metric(MetricKey::Wt));
    println!("  Peak mem:   {}", root.metric(MetricKey::Pmu));

    Ok(())
}

/// Display the recognized metric keys
pub fn display_metrics() {
    println!("Recognized metrics:");
    for key in MetricKey::ALL {
        let kind = if key.is_exclusive() { "exclusive" } else { "inclusive" };
        println!("  {:<5} {:<10} {}", key.as_str(), kind, key.description());
    }
    println!();
    println!("The root call is recorded with caller '{}'.", NO_PARENT);
}

/// Display version information
pub fn display_version() {
    println!("Calltree Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Flat, call-graph and flame-graph views over hierarchical call profiles.");
}
