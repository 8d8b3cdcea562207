//! Output writers for analysis views.
//!
//! This module handles the file boundary:
//! - JSON reports wrapping each view
//! - Reading raw profiles from disk
//! - Text summaries

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_profile, read_json_file, report_to_string, write_report, ViewReport};
pub use summary::generate_text_summary;

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
