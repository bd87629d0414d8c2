//! Dynamically-typed field values for untyped mappings.
//!
//! JSON documents are decoded once into [`FieldValue`], a discriminated union
//! that accessors match explicitly per target type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::DecodeError;

/// String-keyed mapping with dynamically-typed values.
pub type UntypedMapping = HashMap<String, FieldValue>;

/// Numeric payload of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Integer view; floats convert only when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Numeric::Int(i) => Some(i),
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            Numeric::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            Numeric::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(i) => write!(f, "{}", i),
            Numeric::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Int(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Float(value)
    }
}

/// Represents the dynamic type of a value stored in an [`UntypedMapping`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(Numeric),
    Bool(bool),
    Array(Vec<FieldValue>),
    Map(UntypedMapping),
    Bytes(Vec<u8>),
    Null,
}

impl FieldValue {
    /// Short name of the variant, used in diagnostics and by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "bool",
            FieldValue::Array(_) => "array",
            FieldValue::Map(_) => "map",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert back into a JSON value. Bytes become an array of numbers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(Numeric::Int(i)) => serde_json::Value::from(*i),
            FieldValue::Number(Numeric::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Map(map) => mapping_to_json(map),
            FieldValue::Bytes(bytes) => {
                serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
            }
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Array(_) | FieldValue::Map(_) => write!(f, "{}", self.to_json()),
            FieldValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Number(Numeric::Int(i))
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Number(Numeric::Float(f))
                } else {
                    FieldValue::Null
                }
            }
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Array(arr) => {
                FieldValue::Array(arr.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
            serde_json::Value::Null => FieldValue::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Numeric::Int(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(Numeric::Float(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

/// Decode a JSON value into a mapping. Only objects are accepted.
pub fn mapping_from_json(value: serde_json::Value) -> Result<UntypedMapping, DecodeError> {
    match FieldValue::from(value) {
        FieldValue::Map(map) => Ok(map),
        other => Err(DecodeError::NotAnObject {
            found: other.kind(),
        }),
    }
}

/// Parse a JSON document into a mapping.
pub fn decode_mapping(json: &str) -> Result<UntypedMapping, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    mapping_from_json(value)
}

/// JSON view of a mapping with keys in sorted order, so dumps are stable.
pub fn mapping_to_json(mapping: &UntypedMapping) -> serde_json::Value {
    let sorted: BTreeMap<&String, serde_json::Value> =
        mapping.iter().map(|(k, v)| (k, v.to_json())).collect();
    serde_json::Value::Object(
        sorted
            .into_iter()
            .map(|(k, v)| (k.clone(), v))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_mapping_variants() {
        let mapping = decode_mapping(
            r#"{"s": "x", "i": 42, "f": 1.5, "b": true, "a": [1, "two"], "m": {"k": null}, "n": null}"#,
        )
        .unwrap();

        assert_eq!(mapping.get("s"), Some(&FieldValue::String("x".to_string())));
        assert_eq!(mapping.get("i"), Some(&FieldValue::Number(Numeric::Int(42))));
        assert_eq!(mapping.get("f"), Some(&FieldValue::Number(Numeric::Float(1.5))));
        assert_eq!(mapping.get("b"), Some(&FieldValue::Bool(true)));
        assert_eq!(mapping.get("n"), Some(&FieldValue::Null));
        assert_eq!(mapping.get("a").map(FieldValue::kind), Some("array"));
        assert_eq!(mapping.get("m").map(FieldValue::kind), Some("map"));
    }

    #[test]
    fn test_large_unsigned_decodes_as_float() {
        let mapping = decode_mapping(r#"{"big": 18446744073709551615}"#).unwrap();
        assert!(matches!(
            mapping.get("big"),
            Some(FieldValue::Number(Numeric::Float(_)))
        ));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_mapping("[1, 2]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "array" }));

        let err = decode_mapping("{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_mapping_to_json_is_sorted() {
        let mut mapping = UntypedMapping::new();
        mapping.insert("b".to_string(), FieldValue::from(2i64));
        mapping.insert("a".to_string(), FieldValue::from("one"));

        let dumped = mapping_to_json(&mapping).to_string();
        assert_eq!(dumped, r#"{"a":"one","b":2}"#);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Numeric::Int(7).as_f64(), 7.0);
        assert_eq!(Numeric::Float(3.0).as_i64(), Some(3));
        assert_eq!(Numeric::Float(3.5).as_i64(), None);
    }

    #[test]
    fn test_numeric_i64_bounds() {
        assert_eq!(Numeric::Float(9223372036854775808.0).as_i64(), None);
        assert_eq!(Numeric::Float(-9223372036854775808.0).as_i64(), Some(i64::MIN));
        assert_eq!(Numeric::Float(9223372036854774784.0).as_i64(), Some(9223372036854774784));
        assert_eq!(Numeric::Float(f64::INFINITY).as_i64(), None);
        assert_eq!(Numeric::Float(f64::NAN).as_i64(), None);
    }

    #[test]
    fn test_bytes_to_json() {
        let value = FieldValue::Bytes(vec![1, 2]);
        assert_eq!(value.to_json(), json!([1, 2]));
        assert_eq!(value.to_string(), "<2 bytes>");
    }
}
