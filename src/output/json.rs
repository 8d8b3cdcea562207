//! JSON report writer and profile reader.
//!
//! Every view is written inside a versioned envelope so consumers can check
//! compatibility before reading `data`.

use super::validate_path;
use crate::parser::{parse_profile, read_json_value, MetricKey, ProfileNode};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Versioned envelope around one analysis view
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport<T> {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Profile the view was derived from
    pub source: String,

    /// Metric the view was built for, if it is metric-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricKey>,

    /// The view itself
    pub data: T,

    /// Companion function ordering for flame graphs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
}

impl<T: Serialize> ViewReport<T> {
    pub fn new(source: impl Into<String>, metric: Option<MetricKey>, data: T) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            source: source.into(),
            metric,
            data,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Vec<String>) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::Io` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report<T: Serialize>(
    report: &ViewReport<T>,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string
pub fn report_to_string<T: Serialize>(report: &ViewReport<T>) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Read a JSON file (a profile or a written report) as untyped JSON
///
/// Nesting depth is unlimited, matching what call profiles need.
pub fn read_json_file(input_path: impl AsRef<Path>) -> Result<Value, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path)?;
    Ok(read_json_value(serde_json::Deserializer::from_reader(BufReader::new(file)))?)
}

/// Read a raw (un-normalized) profile from a JSON file
///
/// # Errors
/// * `OutputError::Io` - File read error
/// * `OutputError::SerializationFailed` - File is not JSON
/// * `OutputError::Parse` - JSON is not a recognizable profile
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<ProfileNode, OutputError> {
    let root = parse_profile(read_json_file(input_path)?)?;

    debug!("Profile loaded: root '{}'", root.function);

    Ok(root)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
