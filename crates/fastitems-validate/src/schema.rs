//! Declarative field specifications.
//!
//! A [`Schema`] is plain data: an ordered list of [`FieldSpec`]s. It can be
//! built in code with the builder methods below or deserialized from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type a field value is coerced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// JSON string
    Text,
    /// Floating-point number (numeric strings are accepted)
    Float,
    /// Signed 64-bit integer (numeric strings and integral floats are accepted)
    Integer,
    /// Boolean (`"true"`/`"false"`/`"1"`/`"0"` and `0`/`1` are accepted)
    Bool,
    /// Nested object validated against its own schema
    Object(Schema),
}

impl FieldType {
    /// Name used in `TypeMismatch` messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::Bool => "bool",
            FieldType::Object(_) => "object",
        }
    }
}

/// A rule beyond the basic type.
///
/// Length rules apply to text, bound rules to numbers. A rule declared on a
/// field of another type is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Maximum length in characters (inclusive)
    MaxLength(usize),
    /// Minimum length in characters (inclusive)
    MinLength(usize),
    /// Minimum numeric value (inclusive)
    Minimum(f64),
    /// Maximum numeric value (inclusive)
    Maximum(f64),
}

/// What an absent, non-required field resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No value
    #[default]
    Absent,
    /// A concrete default value
    Value(Value),
}

/// Specification of one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key in the input object
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,
    /// Whether an explicit `null` is accepted (and treated as absent)
    #[serde(default)]
    pub nullable: bool,
    /// Resolution for an absent, non-required field
    #[serde(default)]
    pub default: FieldDefault,
    /// Rules checked once the value has the declared type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// A required, non-nullable field.
    pub fn required(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            nullable: false,
            default: FieldDefault::Absent,
            constraints: Vec::new(),
        }
    }

    /// An optional, nullable field that defaults to no value.
    pub fn optional(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            required: false,
            nullable: true,
            ..Self::required(name, ty)
        }
    }

    /// An optional, non-nullable field with a concrete default.
    pub fn with_default(name: impl Into<String>, ty: FieldType, default: impl Into<Value>) -> Self {
        Self {
            required: false,
            default: FieldDefault::Value(default.into()),
            ..Self::required(name, ty)
        }
    }

    /// Add a constraint.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Limit the length of a text value.
    pub fn max_length(self, max: usize) -> Self {
        self.constraint(Constraint::MaxLength(max))
    }

    /// Require a minimum length of a text value.
    pub fn min_length(self, min: usize) -> Self {
        self.constraint(Constraint::MinLength(min))
    }

    /// Lower bound of a numeric value.
    pub fn minimum(self, min: f64) -> Self {
        self.constraint(Constraint::Minimum(min))
    }

    /// Upper bound of a numeric value.
    pub fn maximum(self, max: f64) -> Self {
        self.constraint(Constraint::Maximum(max))
    }
}

/// A named, ordered list of field specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, used in logs
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Look up a field specification by name.
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all declared fields, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builders_set_flags() {
        let name = FieldSpec::required("name", FieldType::Text).max_length(5);
        assert!(name.required && !name.nullable);
        assert_eq!(name.constraints, vec![Constraint::MaxLength(5)]);

        let tax = FieldSpec::optional("tax", FieldType::Float);
        assert!(!tax.required && tax.nullable);
        assert_eq!(tax.default, FieldDefault::Absent);

        let skip = FieldSpec::with_default("skip", FieldType::Integer, 0);
        assert!(!skip.required && !skip.nullable);
        assert_eq!(skip.default, FieldDefault::Value(json!(0)));
    }

    #[test]
    fn schema_loads_from_json() {
        let schema: Schema = serde_json::from_value(json!({
            "name": "User",
            "fields": [
                {"name": "username", "type": "text", "required": true},
                {"name": "full_name", "type": "text", "nullable": true}
            ]
        }))
        .unwrap();

        let expected = Schema::new("User")
            .field(FieldSpec::required("username", FieldType::Text))
            .field(FieldSpec::optional("full_name", FieldType::Text));
        assert_eq!(schema, expected);
    }

    #[test]
    fn nested_schema_serializes() {
        let inner = Schema::new("User").field(FieldSpec::required("username", FieldType::Text));
        let outer = Schema::new("Body").field(FieldSpec::required("user", FieldType::Object(inner)));

        let json = serde_json::to_value(&outer).unwrap();
        assert_eq!(json["fields"][0]["type"]["object"]["name"], "User");

        let back: Schema = serde_json::from_value(json).unwrap();
        assert_eq!(back, outer);
        assert_eq!(back.field_names().collect::<Vec<_>>(), vec!["user"]);
    }
}
