//! Validated records.

use serde_json::{Map, Value};

/// Resolution of one field after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The input carried a value of the declared type
    Present(Value),
    /// The field was not supplied (or was `null`) and has no default
    Absent,
    /// The field was not supplied and took its declared default
    UsesDefault(Value),
}

impl FieldValue {
    /// The resolved value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            FieldValue::Present(v) | FieldValue::UsesDefault(v) => Some(v),
            FieldValue::Absent => None,
        }
    }

    /// `true` when the field resolved to no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// How absent fields are rendered by [`Record::to_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Render absent fields as `null`
    #[default]
    Null,
    /// Leave absent fields out of the object
    Omit,
}

/// A validated record: every declared field, in schema order.
///
/// Fields that were not declared by the schema never appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub(crate) fn new(schema: impl Into<String>, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this record was validated against.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Resolution of `name`, or `None` when the schema does not declare it.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Resolved value of `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::value)
    }

    /// Resolved value of `name` as a string.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Resolved value of `name` as a float.
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_f64)
    }

    /// Resolved value of `name` as an integer.
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    /// Whether `name` resolved to no value.
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).map_or(true, FieldValue::is_absent)
    }

    /// Iterate over `(name, resolution)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize back to a JSON object with the same field names.
    pub fn to_json(&self, policy: AbsentPolicy) -> Value {
        let mut map = Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            match (value.value(), policy) {
                (Some(v), _) => {
                    map.insert(name.clone(), v.clone());
                }
                (None, AbsentPolicy::Null) => {
                    map.insert(name.clone(), Value::Null);
                }
                (None, AbsentPolicy::Omit) => {}
            }
        }
        Value::Object(map)
    }
}
