//! Many-to-one relation references.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::value::json_kind;

/// A many-to-one relation, wired as a two-element `[id, label]` array.
///
/// The label slot may itself carry backend `false` when the related record
/// has no display name. A relation field that is absent altogether is
/// `OptionalValue<Many2One>`; a bare `Many2One` receiving `false` is a
/// decode error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Many2One {
    pub id: i64,
    pub label: Option<String>,
}

impl Many2One {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: Some(label.into()),
        }
    }
}

impl<'de> Deserialize<'de> for Many2One {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        let Value::Array(items) = node else {
            return Err(D::Error::custom(format!(
                "expected relation pair [id, label], got {}",
                json_kind(&node)
            )));
        };
        let [id_node, label_node]: [Value; 2] = match items.try_into() {
            Ok(pair) => pair,
            Err(items) => {
                return Err(D::Error::custom(format!(
                    "expected relation pair [id, label], got array of {}",
                    items.len()
                )));
            }
        };
        let id = id_node.as_i64().ok_or_else(|| {
            D::Error::custom(format!(
                "expected integer relation id, got {}",
                json_kind(&id_node)
            ))
        })?;
        let label = match label_node {
            Value::String(label) => Some(label),
            Value::Bool(false) => None,
            other => {
                return Err(D::Error::custom(format!(
                    "expected relation label string or false, got {}",
                    json_kind(&other)
                )));
            }
        };
        Ok(Many2One { id, label })
    }
}

impl Serialize for Many2One {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.label {
            Some(label) => (self.id, label).serialize(serializer),
            None => (self.id, false).serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_pair() {
        let relation: Many2One = serde_json::from_value(json!([42, "Widget Tmpl"])).unwrap();
        assert_eq!(relation, Many2One::new(42, "Widget Tmpl"));
    }

    #[test]
    fn false_label_means_no_label() {
        let relation: Many2One = serde_json::from_value(json!([42, false])).unwrap();
        assert_eq!(relation.id, 42);
        assert_eq!(relation.label, None);
    }

    #[test]
    fn wrong_arity_is_a_shape_error() {
        let err = serde_json::from_value::<Many2One>(json!([42])).unwrap_err();
        assert!(err.to_string().contains("array of 1"), "{err}");
        let err = serde_json::from_value::<Many2One>(json!([42, "x", "y"])).unwrap_err();
        assert!(err.to_string().contains("array of 3"), "{err}");
    }

    #[test]
    fn bare_false_is_a_shape_error() {
        let err = serde_json::from_value::<Many2One>(json!(false)).unwrap_err();
        assert!(err.to_string().contains("got boolean"), "{err}");
    }

    #[test]
    fn non_integer_id_is_a_shape_error() {
        let err = serde_json::from_value::<Many2One>(json!(["42", "x"])).unwrap_err();
        assert!(err.to_string().contains("relation id"), "{err}");
    }

    #[test]
    fn serializes_back_to_pair() {
        let wire = serde_json::to_value(Many2One::new(7, "Partner")).unwrap();
        assert_eq!(wire, json!([7, "Partner"]));
        let unlabeled = Many2One { id: 7, label: None };
        assert_eq!(serde_json::to_value(unlabeled).unwrap(), json!([7, false]));
    }
}
