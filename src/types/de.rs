//! Lenient deserializers for loosely typed backend fields

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::services::normalizer::normalize_features;

/// Treat an explicit `null` like a missing field.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `150`, `150.5`, `"150"` and `null`/`""` (as 0).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Accept `2`, `"2"`; anything else (including `""`) becomes `None`.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Decode any feature representation into clean display strings.
pub fn features<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_features(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "nullable")]
        text: String,
        #[serde(default, deserialize_with = "lenient_f64")]
        price: f64,
        #[serde(default, deserialize_with = "lenient_u32")]
        count: Option<u32>,
    }

    #[test]
    fn test_null_string_becomes_empty() {
        let sample: Sample = serde_json::from_value(json!({ "text": null })).unwrap();
        assert_eq!(sample.text, "");
    }

    #[test]
    fn test_price_from_string() {
        let sample: Sample = serde_json::from_value(json!({ "price": " 249.5 " })).unwrap();
        assert!((sample.price - 249.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_garbage_is_zero() {
        let sample: Sample = serde_json::from_value(json!({ "price": "call us" })).unwrap();
        assert!((sample.price - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_count_from_string_and_blank() {
        let sample: Sample = serde_json::from_value(json!({ "count": "4" })).unwrap();
        assert_eq!(sample.count, Some(4));

        let sample: Sample = serde_json::from_value(json!({ "count": "" })).unwrap();
        assert_eq!(sample.count, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.text, "");
        assert_eq!(sample.count, None);
    }
}
