//! Optional-value codec for the backend's false-as-absent convention.
//!
//! The backend never omits a projected field: a field with no value comes
//! back as the JSON literal `false`. `OptionalValue<T>` is the one place
//! that convention is decoded, so record types never special-case it per
//! field.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A field value that is either a real `T` or absent (wire `false`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalValue<T> {
    Value(T),
    Absent,
}

impl<T> OptionalValue<T> {
    pub fn value(self) -> Option<T> {
        match self {
            OptionalValue::Value(value) => Some(value),
            OptionalValue::Absent => None,
        }
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            OptionalValue::Value(value) => Some(value),
            OptionalValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, OptionalValue::Absent)
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            OptionalValue::Value(value) => value,
            OptionalValue::Absent => default,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OptionalValue<U> {
        match self {
            OptionalValue::Value(value) => OptionalValue::Value(f(value)),
            OptionalValue::Absent => OptionalValue::Absent,
        }
    }
}

impl OptionalValue<String> {
    /// Outbound normalization for write/create payloads: an empty string is
    /// sent as backend `false` rather than an empty value.
    pub fn from_non_empty(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            OptionalValue::Absent
        } else {
            OptionalValue::Value(text)
        }
    }
}

impl<T> Default for OptionalValue<T> {
    fn default() -> Self {
        OptionalValue::Absent
    }
}

impl<T> From<Option<T>> for OptionalValue<T> {
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => OptionalValue::Value(value),
            None => OptionalValue::Absent,
        }
    }
}

impl<T> From<OptionalValue<T>> for Option<T> {
    fn from(value: OptionalValue<T>) -> Self {
        value.value()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for OptionalValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        if node == Value::Bool(false) {
            return Ok(OptionalValue::Absent);
        }
        let kind = json_kind(&node);
        serde_json::from_value(node)
            .map(OptionalValue::Value)
            .map_err(|err| {
                D::Error::custom(format!(
                    "expected {} or false, got {kind}: {err}",
                    std::any::type_name::<T>()
                ))
            })
    }
}

impl<T: Serialize> Serialize for OptionalValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionalValue::Value(value) => value.serialize(serializer),
            // Absent fields that ARE sent travel as backend false.
            OptionalValue::Absent => serializer.serialize_bool(false),
        }
    }
}

/// JSON node kind for decode diagnostics.
pub(crate) fn json_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Many2One;
    use serde_json::json;

    #[test]
    fn false_decodes_as_absent_for_scalars() {
        let value: OptionalValue<String> = serde_json::from_value(json!(false)).unwrap();
        assert!(value.is_absent());
        let value: OptionalValue<f64> = serde_json::from_value(json!(false)).unwrap();
        assert!(value.is_absent());
    }

    #[test]
    fn false_decodes_as_absent_for_composites() {
        let value: OptionalValue<Vec<i64>> = serde_json::from_value(json!(false)).unwrap();
        assert!(value.is_absent());
        let value: OptionalValue<Many2One> = serde_json::from_value(json!(false)).unwrap();
        assert!(value.is_absent());
    }

    #[test]
    fn real_values_decode_through() {
        let value: OptionalValue<String> = serde_json::from_value(json!("8901234")).unwrap();
        assert_eq!(value.value().as_deref(), Some("8901234"));
        let value: OptionalValue<Vec<i64>> = serde_json::from_value(json!([3, 7])).unwrap();
        assert_eq!(value.value(), Some(vec![3, 7]));
    }

    #[test]
    fn true_is_a_value_for_bool_fields() {
        let value: OptionalValue<bool> = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(value.value(), Some(true));
        let value: OptionalValue<bool> = serde_json::from_value(json!(false)).unwrap();
        assert!(value.is_absent());
    }

    #[test]
    fn type_mismatch_is_an_error_not_absent() {
        let result = serde_json::from_value::<OptionalValue<f64>>(json!("twelve"));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("got string"), "{message}");
    }

    #[test]
    fn absent_serializes_as_false() {
        let absent: OptionalValue<String> = OptionalValue::Absent;
        assert_eq!(serde_json::to_value(&absent).unwrap(), json!(false));
        let present = OptionalValue::Value("x".to_string());
        assert_eq!(serde_json::to_value(&present).unwrap(), json!("x"));
    }

    #[test]
    fn sent_fields_round_trip() {
        let original = OptionalValue::Value(vec![1i64, 2, 3]);
        let wire = serde_json::to_value(&original).unwrap();
        let back: OptionalValue<Vec<i64>> = serde_json::from_value(wire).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn from_non_empty_maps_empty_string_to_absent() {
        assert!(OptionalValue::from_non_empty("").is_absent());
        assert_eq!(
            OptionalValue::from_non_empty("4006381333931").value().as_deref(),
            Some("4006381333931")
        );
    }
}
