//! Raw profile parser.
//!
//! Accepts the JSON shapes produced by profile exporters and turns them into
//! a raw (un-normalized) [`ProfileNode`] tree:
//! - a bare root node: `{"function": "main()", "wt": 100, "children": [...]}`
//! - a document wrapping the root under `profile`, `data` or `root`

use super::schema::ProfileNode;
use crate::utils::config::PROFILE_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

/// Parse a raw profile from a JSON value
///
/// **Public** - main entry point for parsing
///
/// Takes the document by value so the root node is moved out, not copied.
///
/// # Errors
/// * `ParseError::JsonError` - the root node does not match the node schema
/// * `ParseError::InvalidFormat` - no root node could be located
pub fn parse_profile(mut raw: Value) -> Result<ProfileNode, ParseError> {
    let root_value = match root_field(&raw)? {
        None => raw,
        Some(field) => raw.get_mut(field).map(Value::take).unwrap_or_default(),
    };
    let root = ProfileNode::deserialize(serde_stacker::Deserializer::new(root_value))?;

    debug!(
        "Parsed profile rooted at '{}' with {} nodes",
        root.function,
        root.node_count()
    );

    if root.children.is_empty() {
        warn!("Profile root '{}' has no children", root.function);
    }

    Ok(root)
}

/// Parse a raw profile from JSON text
pub fn parse_profile_str(text: &str) -> Result<ProfileNode, ParseError> {
    let raw = read_json_value(serde_json::Deserializer::from_str(text))?;
    parse_profile(raw)
}

/// Read one JSON document without a nesting limit
///
/// Call trees nest one object and one array per call level, so real
/// profiles routinely go deeper than serde_json's default limit. The stack
/// grows on demand instead.
pub fn read_json_value<'de, R>(mut json: serde_json::Deserializer<R>) -> Result<Value, serde_json::Error>
where
    R: serde_json::de::Read<'de>,
{
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// Check that a JSON value looks like a profile without building the tree
///
/// **Public** - useful for validation before doing heavier work
pub fn validate_profile_format(raw: &Value) -> bool {
    root_field(raw).is_ok()
}

/// Locate the root node: `None` when the document is the root itself,
/// otherwise the field it is nested under
///
/// **Private** - internal helper for parse_profile
fn root_field(raw: &Value) -> Result<Option<&'static str>, ParseError> {
    let obj = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Profile must be a JSON object".to_string())
    })?;

    if obj.contains_key("function") || obj.contains_key("name") {
        return Ok(None);
    }

    for field in PROFILE_FIELD_NAMES {
        if obj.get(*field).is_some_and(Value::is_object) {
            debug!("Found profile root under '{}'", field);
            return Ok(Some(*field));
        }
    }

    Err(ParseError::InvalidFormat(format!(
        "No root call found (expected a node or one of: {})",
        PROFILE_FIELD_NAMES.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::MetricKey;
    use serde_json::json;

    #[test]
    fn test_parse_bare_root() {
        let raw = json!({"function": "main()", "wt": 100, "ct": 1});
        let root = parse_profile(raw).unwrap();
        assert_eq!(root.function, "main()");
        assert_eq!(root.metric(MetricKey::Wt), 100.0);
    }

    #[test]
    fn test_parse_wrapped_root() {
        for field in PROFILE_FIELD_NAMES {
            let mut raw = json!({"meta": {"url": "/"}});
            raw[*field] = json!({"function": "main()", "wt": 5});
            let root = parse_profile(raw).unwrap();
            assert_eq!(root.function, "main()", "field = {}", field);
        }
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_profile(json!([1, 2, 3])),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(!validate_profile_format(&json!("main")));
    }

    #[test]
    fn test_parse_rejects_missing_root() {
        let raw = json!({"meta": {"url": "/"}});
        assert!(matches!(parse_profile(raw), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_bad_metric_type() {
        let raw = json!({"function": "main()", "wt": "fast"});
        assert!(matches!(parse_profile(raw), Err(ParseError::JsonError(_))));
    }

    /// `{"function": "f0", "children": [{"function": "f1", ...}]}`, `depth` calls below the root
    fn nested_profile_json(depth: usize) -> String {
        let mut text = format!(r#"{{"function": "f{}", "wt": 1}}"#, depth);
        for level in (0..depth).rev() {
            text = format!(
                r#"{{"function": "f{}", "wt": {}, "children": [{}]}}"#,
                level,
                depth - level + 1,
                text
            );
        }
        text
    }

    #[test]
    fn test_parse_deeply_nested_profile() {
        let root = parse_profile_str(&nested_profile_json(200)).unwrap();

        assert_eq!(root.function, "f0");
        assert_eq!(root.node_count(), 201);
        assert_eq!(root.max_depth(), 200);
        assert_eq!(root.metric(MetricKey::Wt), 201.0);
    }

    #[test]
    fn test_parse_deeply_nested_value() {
        let raw: Value = read_json_value(serde_json::Deserializer::from_str(&format!(
            r#"{{"profile": {}}}"#,
            nested_profile_json(300)
        )))
        .unwrap();
        assert!(validate_profile_format(&raw));

        let root = parse_profile(raw).unwrap();
        assert_eq!(root.max_depth(), 300);
    }

    #[test]
    fn test_read_json_value_rejects_trailing_data() {
        assert!(read_json_value(serde_json::Deserializer::from_str(r#"{"function": "f"} x"#)).is_err());
    }

    #[test]
    fn test_parse_profile_str() {
        let root = parse_profile_str(r#"{"profile": {"name": "main()", "children": null}}"#).unwrap();
        assert_eq!(root.function, "main()");
        assert!(root.children.is_empty());
    }
}
