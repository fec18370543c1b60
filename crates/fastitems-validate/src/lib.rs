//! # fastitems validation
//!
//! Data-driven request validation. A [`Schema`] is an ordered table of
//! [`FieldSpec`]s interpreted by one generic function, [`Schema::validate`],
//! which turns an untyped JSON object into a [`Record`] or into a
//! [`ValidationError`] listing every violation.
//!
//! ## Example
//!
//! ```rust
//! use fastitems_validate::prelude::*;
//! use serde_json::json;
//!
//! let item = Schema::new("Item")
//!     .field(FieldSpec::required("name", FieldType::Text).max_length(5))
//!     .field(FieldSpec::optional("description", FieldType::Text))
//!     .field(FieldSpec::required("price", FieldType::Float))
//!     .field(FieldSpec::optional("tax", FieldType::Float));
//!
//! let record = item.validate_value(&json!({"name": "Foo", "price": 42.0})).unwrap();
//! assert_eq!(record.str("name"), Some("Foo"));
//! assert!(record.is_absent("tax"));
//!
//! let err = item.validate_value(&json!({"name": "Toolong", "price": 1.0})).unwrap_err();
//! assert_eq!(err.violations[0].kind, ViolationKind::ConstraintViolation);
//! assert_eq!(err.violations[0].message, "max length 5");
//! ```
//!
//! ## Coercion
//!
//! - `text` accepts only strings
//! - `float` accepts numbers and numeric strings
//! - `integer` accepts integers, integral floats and integer strings
//! - `bool` accepts booleans, `0`/`1` and `"true"`/`"false"`/`"1"`/`"0"`
//! - `object` validates recursively; nested violations use dotted paths

mod error;
mod model;
mod record;
mod schema;
mod validate;

pub use error::{ValidationError, Violation, ViolationKind};
pub use model::Model;
pub use record::{AbsentPolicy, FieldValue, Record};
pub use schema::{Constraint, FieldDefault, FieldSpec, FieldType, Schema};
pub use validate::json_type_name;

/// Field name used for violations about the input as a whole.
pub const ROOT_FIELD: &str = "__root__";

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::{ValidationError, Violation, ViolationKind};
    pub use crate::model::Model;
    pub use crate::record::{AbsentPolicy, FieldValue, Record};
    pub use crate::schema::{Constraint, FieldDefault, FieldSpec, FieldType, Schema};
}
