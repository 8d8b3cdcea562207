//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod relatives;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, validate_args};
pub use models::{AnalyzeArgs, RelativesArgs, View};
pub use relatives::{execute_relatives, validate_relatives_args};
pub use utils::{display_metrics, display_version, validate_profile_file};
