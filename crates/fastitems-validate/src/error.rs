//! Validation error types and JSON error format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Category of a single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field was not present in the input.
    MissingField,
    /// The value could not be coerced to the declared type.
    TypeMismatch,
    /// The value has the right type but breaks a declared constraint.
    ConstraintViolation,
}

impl ViolationKind {
    /// Wire name of the kind (e.g. `"missing_field"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing_field",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::ConstraintViolation => "constraint_violation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The field name that failed validation (nested: "item.name")
    pub field: String,
    /// What went wrong
    pub kind: ViolationKind,
    /// Human-readable error message
    pub message: String,
    /// Optional additional parameters (expected/actual type, limit, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, serde_json::Value>,
}

impl Violation {
    /// Create a new violation without parameters.
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Create a `MissingField` violation.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::MissingField, "field required")
    }

    /// Create a `TypeMismatch` violation recording both types.
    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(
            field,
            ViolationKind::TypeMismatch,
            format!("expected {expected}, got {actual}"),
        )
        .param("expected", expected)
        .param("actual", actual)
    }

    /// Add a parameter to the violation.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Prepend a parent path segment, turning `name` into `item.name`.
    pub(crate) fn nested_under(mut self, parent: &str) -> Self {
        self.field = if self.field == crate::ROOT_FIELD {
            parent.to_string()
        } else {
            format!("{parent}.{}", self.field)
        };
        self
    }
}

/// Internal error structure for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    fields: Vec<Violation>,
}

/// Wrapper for the error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

/// Validation error containing every field violation found in one pass.
///
/// Serializes to:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "fields": [{"field": "name", "kind": "constraint_violation", "message": "max length 5"}]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Collection of field-level violations, in schema order
    pub violations: Vec<Violation>,
    /// Summary message (default: "Validation failed")
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error from a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations,
            message: "Validation failed".to_string(),
        }
    }

    /// Create a validation error for a single violation.
    pub fn single(violation: Violation) -> Self {
        Self::new(vec![violation])
    }

    /// Check if there are any violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Get the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations reported for `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.field == field)
    }

    /// Whether a violation of `kind` exists for `field`.
    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.for_field(field).any(|v| v.kind == kind)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} field error(s)", self.message, self.violations.len())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wrapper = ErrorWrapper {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: self.message.clone(),
                fields: self.violations.clone(),
            },
        };
        wrapper.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidationError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wrapper = ErrorWrapper::deserialize(deserializer)?;
        Ok(Self {
            violations: wrapper.error.fields,
            message: wrapper.error.message,
        })
    }
}
