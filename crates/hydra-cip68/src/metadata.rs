//! Input-boundary model for caller-supplied CIP-68 metadata.
//!
//! Arbitrary JSON-shaped metadata is converted once into [`MetadataValue`]
//! and every later stage pattern-matches the tagged variants instead of
//! guessing at runtime shapes.

use indexmap::IndexMap;
use serde_json::Value;

/// One node of a caller-supplied metadata tree.
///
/// `Other` carries the pre-stringified text of a scalar-like shape the model
/// does not otherwise distinguish (JSON `null` is the only such shape that
/// can reach us through serde); canonicalization encodes it best-effort
/// rather than rejecting the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    BigInt(i128),
    Sequence(Vec<MetadataValue>),
    Mapping(IndexMap<String, MetadataValue>),
    Other(String),
}

impl MetadataValue {
    /// Builds the tagged tree from a JSON value.
    ///
    /// Integers (fitting `i64` or `u64`) become `BigInt`; any other JSON
    /// number becomes `Number`. Object key order is preserved.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Bool(flag) => Self::Boolean(flag),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Self::BigInt(i128::from(int))
                } else if let Some(int) = number.as_u64() {
                    Self::BigInt(i128::from(int))
                } else {
                    Self::Number(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from_json).collect())
            }
            Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_json(value)))
                    .collect(),
            ),
            Value::Null => Self::Other("null".to_string()),
        }
    }

    /// Canonical decimal/text form of a scalar variant; `None` for composites.
    ///
    /// Numbers use `f64` `Display`, which always renders plain decimal:
    /// `1e21` becomes `"1000000000000000000000"`, never `"1e+21"`. Datums
    /// written by encoders that switch to scientific notation for extreme
    /// floats will differ byte-for-byte in those leaves.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Text(text) | Self::Other(text) => Some(text.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Boolean(flag) => Some(flag.to_string()),
            Self::BigInt(int) => Some(int.to_string()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Human-readable shape name used in error and log messages.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::BigInt(_) => "big integer",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Other(_) => "opaque scalar",
        }
    }
}

impl From<Value> for MetadataValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn object_key_order_is_preserved() {
        let value = MetadataValue::from_json(json!({"zz": 1, "aa": 2, "mm": 3}));
        let MetadataValue::Mapping(entries) = value else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn integers_become_big_integers() {
        assert_eq!(
            MetadataValue::from_json(json!(5_000_000)),
            MetadataValue::BigInt(5_000_000)
        );
        assert_eq!(
            MetadataValue::from_json(json!(-7)),
            MetadataValue::BigInt(-7)
        );
    }

    #[test]
    fn scalar_text_matches_display_forms() {
        assert_eq!(
            MetadataValue::Number(3.14).scalar_text().expect("scalar"),
            "3.14"
        );
        assert_eq!(
            MetadataValue::Boolean(true).scalar_text().expect("scalar"),
            "true"
        );
        assert_eq!(
            MetadataValue::BigInt(5_000_000).scalar_text().expect("scalar"),
            "5000000"
        );
        assert_eq!(
            MetadataValue::from_json(json!(null)).scalar_text().expect("scalar"),
            "null"
        );
        assert!(MetadataValue::Sequence(Vec::new()).scalar_text().is_none());
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        // f64 Display drops the trailing ".0", matching the reference encoding.
        assert_eq!(
            MetadataValue::Number(5.0).scalar_text().expect("scalar"),
            "5"
        );
    }

    #[test]
    fn extreme_floats_render_in_plain_decimal() {
        // f64 Display never switches to scientific notation; encoders that
        // emit "1e+21" for this magnitude will differ in these leaves.
        assert_eq!(
            MetadataValue::Number(1e21).scalar_text().expect("scalar"),
            "1000000000000000000000"
        );
        assert_eq!(
            MetadataValue::Number(1e-7).scalar_text().expect("scalar"),
            "0.0000001"
        );
    }
}
