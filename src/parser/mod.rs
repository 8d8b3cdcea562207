//! Profile parsing, schema definitions and name normalization.
//!
//! This module handles:
//! - Parsing raw profile JSON
//! - Defining the profile node schema and metric keys
//! - Folding owning types into canonical function names

pub mod normalize;
pub mod profile;
pub mod schema;

// Re-export main types
pub use normalize::{normalize_names, CallTree};
pub use profile::{parse_profile, parse_profile_str, read_json_value, validate_profile_format};
pub use schema::{MetricKey, Metrics, ProfileNode};
