//! Typed records bound to a schema.

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::record::{AbsentPolicy, Record};
use crate::schema::Schema;
use crate::ROOT_FIELD;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A typed record type whose shape is described by a [`Schema`].
///
/// The schema decides what is accepted; serde only maps the resolved record
/// onto the struct.
///
/// ## Example
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct User {
///     username: String,
///     full_name: Option<String>,
/// }
///
/// impl Model for User {
///     fn schema() -> &'static Schema {
///         static SCHEMA: OnceLock<Schema> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             Schema::new("User")
///                 .field(FieldSpec::required("username", FieldType::Text))
///                 .field(FieldSpec::optional("full_name", FieldType::Text))
///         })
///     }
/// }
///
/// let user = User::from_json(&json!({"username": "dave"}))?;
/// ```
pub trait Model: Sized + DeserializeOwned {
    /// The schema instances of this type are validated against.
    fn schema() -> &'static Schema;

    /// Build the typed value from an already validated record.
    fn from_record(record: &Record) -> Result<Self, ValidationError> {
        serde_json::from_value(record.to_json(AbsentPolicy::Null)).map_err(|e| {
            ValidationError::single(Violation::new(
                ROOT_FIELD,
                ViolationKind::TypeMismatch,
                format!("record does not match {}: {e}", record.schema_name()),
            ))
        })
    }

    /// Validate `value` and build the typed value.
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let record = Self::schema().validate_value(value)?;
        Self::from_record(&record)
    }
}
