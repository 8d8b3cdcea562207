//! Configuration and constants for the library and CLI.

/// Current output report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Caller name recorded for the root call, which has no logical parent
pub const NO_PARENT: &str = "__top__";

/// Metric used when the caller does not pick one
pub const DEFAULT_METRIC: &str = "wt";

/// Minimum share of the root total a child must exceed to stay in a graph view
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Default number of rows in top-function listings
pub const DEFAULT_TOP_FUNCTIONS: usize = 20;

/// Label of the bucket that collects everything outside the top N
pub const OTHER_BUCKET: &str = "Other";

// Field names under which profile exporters nest the root call
pub const PROFILE_FIELD_NAMES: &[&str] = &["profile", "data", "root"];
