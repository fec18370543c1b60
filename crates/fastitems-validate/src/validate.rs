//! The generic validation function.
//!
//! Every declared field is resolved independently and all violations are
//! collected, so a caller sees every problem in a single pass.

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::record::{AbsentPolicy, FieldValue, Record};
use crate::schema::{Constraint, FieldDefault, FieldSpec, FieldType, Schema};
use crate::ROOT_FIELD;
use serde_json::{Map, Number, Value};

impl Schema {
    /// Validate a decoded JSON object against this schema.
    ///
    /// Extra keys are ignored. Either every field resolves or the complete
    /// list of violations is returned.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Record, ValidationError> {
        let mut violations = Vec::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for spec in &self.fields {
            match resolve(spec, input.get(&spec.name)) {
                Ok(value) => fields.push((spec.name.clone(), value)),
                Err(mut errs) => violations.append(&mut errs),
            }
        }

        if violations.is_empty() {
            Ok(Record::new(self.name.clone(), fields))
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Validate an arbitrary JSON value, which must be an object.
    pub fn validate_value(&self, input: &Value) -> Result<Record, ValidationError> {
        match input {
            Value::Object(map) => self.validate(map),
            other => Err(ValidationError::single(Violation::type_mismatch(
                ROOT_FIELD,
                "object",
                json_type_name(other),
            ))),
        }
    }
}

fn resolve(spec: &FieldSpec, raw: Option<&Value>) -> Result<FieldValue, Vec<Violation>> {
    let value = match raw {
        None if spec.required => return Err(vec![Violation::missing(&spec.name)]),
        None => {
            return Ok(match &spec.default {
                FieldDefault::Absent => FieldValue::Absent,
                FieldDefault::Value(v) => FieldValue::UsesDefault(v.clone()),
            })
        }
        Some(Value::Null) if spec.nullable => return Ok(FieldValue::Absent),
        Some(value) => coerce(&spec.name, &spec.ty, value)?,
    };

    let violations: Vec<Violation> = spec
        .constraints
        .iter()
        .filter_map(|c| check(&spec.name, c, &value))
        .collect();

    if violations.is_empty() {
        Ok(FieldValue::Present(value))
    } else {
        Err(violations)
    }
}

fn coerce(field: &str, ty: &FieldType, value: &Value) -> Result<Value, Vec<Violation>> {
    let mismatch = || vec![Violation::type_mismatch(field, ty.name(), json_type_name(value))];

    match ty {
        FieldType::Text => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        FieldType::Float => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch)
        }
        FieldType::Integer => {
            let parsed = match value {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            parsed.map(Value::from).ok_or_else(mismatch)
        }
        FieldType::Bool => {
            let parsed = match value {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Some(false),
                    Some(1) => Some(true),
                    _ => None,
                },
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                },
                _ => None,
            };
            parsed.map(Value::Bool).ok_or_else(mismatch)
        }
        FieldType::Object(schema) => match schema.validate_value(value) {
            Ok(record) => Ok(record.to_json(AbsentPolicy::Null)),
            Err(err) => Err(err
                .violations
                .into_iter()
                .map(|v| v.nested_under(field))
                .collect()),
        },
    }
}

/// An integral float that fits in `i64`.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn check(field: &str, constraint: &Constraint, value: &Value) -> Option<Violation> {
    let violated = |message: String, limit: Value, actual: Value| {
        Some(
            Violation::new(field, ViolationKind::ConstraintViolation, message)
                .param("limit", limit)
                .param("actual", actual),
        )
    };

    match (constraint, value) {
        (Constraint::MaxLength(max), Value::String(s)) => {
            let len = s.chars().count();
            if len > *max {
                return violated(format!("max length {max}"), Value::from(*max), Value::from(len));
            }
            None
        }
        (Constraint::MinLength(min), Value::String(s)) => {
            let len = s.chars().count();
            if len < *min {
                return violated(format!("min length {min}"), Value::from(*min), Value::from(len));
            }
            None
        }
        (Constraint::Minimum(min), Value::Number(n)) => match n.as_f64() {
            Some(x) if x < *min => violated(format!("must be >= {min}"), Value::from(*min), value.clone()),
            _ => None,
        },
        (Constraint::Maximum(max), Value::Number(n)) => match n.as_f64() {
            Some(x) if x > *max => violated(format!("must be <= {max}"), Value::from(*max), value.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Name of a JSON value's type, as reported in `TypeMismatch` messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Schema {
        Schema::new("Person")
            .field(FieldSpec::required("nick", FieldType::Text).min_length(2).max_length(4))
            .field(FieldSpec::required("age", FieldType::Integer).minimum(0.0).maximum(150.0))
            .field(FieldSpec::optional("height", FieldType::Float))
            .field(FieldSpec::with_default("active", FieldType::Bool, true))
    }

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn resolves_all_fields() {
        let record = person()
            .validate(&obj(json!({"nick": "bob", "age": 30, "height": 1.8})))
            .unwrap();

        assert_eq!(record.str("nick"), Some("bob"));
        assert_eq!(record.i64("age"), Some(30));
        assert_eq!(record.f64("height"), Some(1.8));
        assert_eq!(record.get("active"), Some(&FieldValue::UsesDefault(json!(true))));
    }

    #[test]
    fn null_on_nullable_is_absent() {
        let record = person()
            .validate(&obj(json!({"nick": "bob", "age": 1, "height": null})))
            .unwrap();
        assert_eq!(record.get("height"), Some(&FieldValue::Absent));
    }

    #[test]
    fn null_on_required_is_type_mismatch() {
        let err = person()
            .validate(&obj(json!({"nick": null, "age": 1})))
            .unwrap_err();
        assert!(err.has("nick", ViolationKind::TypeMismatch));
        assert_eq!(err.violations[0].params["actual"], "null");
    }

    #[test]
    fn coerces_numeric_strings() {
        let record = person()
            .validate(&obj(json!({"nick": "bob", "age": " 42 ", "height": "1.5", "active": "false"})))
            .unwrap();
        assert_eq!(record.i64("age"), Some(42));
        assert_eq!(record.f64("height"), Some(1.5));
        assert_eq!(record.value("active"), Some(&json!(false)));
    }

    #[test]
    fn integral_float_is_integer() {
        let record = person().validate(&obj(json!({"nick": "bob", "age": 7.0}))).unwrap();
        assert_eq!(record.i64("age"), Some(7));

        let err = person().validate(&obj(json!({"nick": "bob", "age": 7.5}))).unwrap_err();
        assert!(err.has("age", ViolationKind::TypeMismatch));
    }

    #[test]
    fn text_is_strict() {
        let err = person().validate(&obj(json!({"nick": 12, "age": 1}))).unwrap_err();
        assert_eq!(err.violations[0].message, "expected text, got integer");
    }

    #[test]
    fn non_numeric_string_rejected() {
        let err = person()
            .validate(&obj(json!({"nick": "bob", "age": "abc", "height": "tall"})))
            .unwrap_err();
        assert!(err.has("age", ViolationKind::TypeMismatch));
        assert!(err.has("height", ViolationKind::TypeMismatch));
    }

    #[test]
    fn collects_every_violation() {
        let err = person()
            .validate(&obj(json!({"nick": "toolong", "age": 200, "active": "maybe"})))
            .unwrap_err();

        assert_eq!(err.len(), 3);
        assert_eq!(err.violations[0].field, "nick");
        assert_eq!(err.violations[0].message, "max length 4");
        assert_eq!(err.violations[0].params["limit"], 4);
        assert_eq!(err.violations[0].params["actual"], 7);
        assert_eq!(err.violations[1].message, "must be <= 150");
        assert!(err.has("active", ViolationKind::TypeMismatch));
    }

    #[test]
    fn min_constraints() {
        let err = person().validate(&obj(json!({"nick": "é", "age": -1}))).unwrap_err();
        assert_eq!(err.violations[0].message, "min length 2");
        assert_eq!(err.violations[1].message, "must be >= 0");
    }

    #[test]
    fn length_counts_characters() {
        assert!(person().validate(&obj(json!({"nick": "ñañá", "age": 1}))).is_ok());
    }

    #[test]
    fn missing_required() {
        let err = person().validate(&Map::new()).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.has("nick", ViolationKind::MissingField));
        assert!(err.has("age", ViolationKind::MissingField));
        assert_eq!(err.violations[0].message, "field required");
    }

    #[test]
    fn non_object_input() {
        let err = person().validate_value(&json!([1, 2])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations[0].field, ROOT_FIELD);
        assert_eq!(err.violations[0].message, "expected object, got array");
    }

    #[test]
    fn nested_violations_use_dotted_paths() {
        let body = Schema::new("Body")
            .field(FieldSpec::required("person", FieldType::Object(person())))
            .field(FieldSpec::required("count", FieldType::Integer));

        let err = body
            .validate(&obj(json!({"person": {"nick": "x"}, "count": "many"})))
            .unwrap_err();

        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["person.nick", "person.age", "count"]);

        let err = body.validate(&obj(json!({"person": 3, "count": 1}))).unwrap_err();
        assert_eq!(err.violations[0].field, "person");
    }

    #[test]
    fn nested_record_is_rendered_with_nulls() {
        let body = Schema::new("Body").field(FieldSpec::required("person", FieldType::Object(person())));
        let record = body
            .validate(&obj(json!({"person": {"nick": "ab", "age": 3, "extra": 1}})))
            .unwrap();

        assert_eq!(
            record.value("person"),
            Some(&json!({"nick": "ab", "age": 3, "height": null, "active": true}))
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
