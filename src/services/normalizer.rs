//! Service feature normalization
//!
//! The backend has stored service features in every shape imaginable:
//! arrays of strings, arrays of `{name|value|text|label}` objects,
//! JSON-encoded arrays inside a string, comma-separated strings, single
//! values, and plain key/value objects. Everything is reduced to an ordered
//! list of trimmed, non-empty display strings.

use serde_json::{Map, Value};

/// Object fields checked for a feature label, in priority order
const LABEL_FIELDS: [&str; 4] = ["name", "value", "text", "label"];

/// Closed set of input shapes the normalizer distinguishes
enum FeatureShape<'a> {
    /// `null`, `false`, `0`, `""`
    Empty,
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Text(&'a str),
    /// `true` or a non-zero number
    Scalar,
}

impl<'a> FeatureShape<'a> {
    fn of(value: &'a Value) -> Self {
        if !is_truthy(value) {
            return FeatureShape::Empty;
        }
        match value {
            Value::Array(items) => FeatureShape::Sequence(items),
            Value::Object(map) => FeatureShape::Mapping(map),
            Value::String(text) => FeatureShape::Text(text),
            _ => FeatureShape::Scalar,
        }
    }
}

/// Normalize any feature representation into display strings.
///
/// Never fails; the worst case is an empty list.
///
/// # Examples
/// ```
/// use gocab::services::normalizer::normalize_features;
/// use serde_json::json;
///
/// assert_eq!(
///     normalize_features(&json!("AC Vehicle, GPS Tracking")),
///     vec!["AC Vehicle", "GPS Tracking"]
/// );
/// assert!(normalize_features(&json!(null)).is_empty());
/// ```
pub fn normalize_features(value: &Value) -> Vec<String> {
    match FeatureShape::of(value) {
        FeatureShape::Empty | FeatureShape::Scalar => Vec::new(),
        FeatureShape::Sequence(items) => from_sequence(items.iter()),
        FeatureShape::Mapping(map) => from_sequence(map.values().filter(|v| is_truthy(v))),
        FeatureShape::Text(text) => from_text(text),
    }
}

/// Normalize comma-separated editor input ("AC, GPS , ").
pub fn parse_feature_input(input: &str) -> Vec<String> {
    normalize_features(&Value::String(input.to_string()))
}

fn from_sequence<'a>(items: impl Iterator<Item = &'a Value>) -> Vec<String> {
    items.filter_map(element_label).collect()
}

fn from_text(raw: &str) -> Vec<String> {
    let decoded = decode_entities(raw);
    let clean = decoded.trim();
    if clean.is_empty() {
        return Vec::new();
    }

    if clean.starts_with('[') && clean.ends_with(']') {
        // Unparseable "arrays" fall through to the comma/single-value rules
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(clean) {
            return from_sequence(items.iter());
        }
    }

    if clean.contains(',') {
        return clean
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
    }

    vec![clean.to_string()]
}

fn element_label(item: &Value) -> Option<String> {
    let label = match item {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => object_label(map),
        Value::Array(items) if items.is_empty() => return None,
        Value::Array(_) => strip_serialized(item),
        other => display_string(other).trim().to_string(),
    };
    (!label.is_empty()).then_some(label)
}

fn object_label(map: &Map<String, Value>) -> String {
    for field in LABEL_FIELDS {
        if let Some(v) = map.get(field).filter(|v| is_truthy(v)) {
            let label = display_string(v).trim().to_string();
            if !label.is_empty() {
                return label;
            }
        }
    }
    if map.is_empty() {
        return String::new();
    }
    // TODO: log dropped/flattened objects once product decides whether they count as data loss
    strip_serialized(&Value::Object(map.clone()))
}

/// Serialize and strip braces and quotes: `{"seats":4}` → `seats:4`
fn strip_serialized(value: &Value) -> String {
    value
        .to_string()
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => strip_serialized(value),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
