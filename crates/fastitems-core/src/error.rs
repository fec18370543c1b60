//! Error types for fastitems

use fastitems_validate::ValidationError;
use http::StatusCode;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Result type alias for handlers and extractors
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Where a rejected value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Query,
    Path,
}

/// Standard API error type
///
/// Provides structured error responses following a consistent JSON format.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error type identifier
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level validation errors
    pub fields: Option<Vec<FieldError>>,
    /// Internal details, logged but never sent to the client
    pub(crate) internal: Option<String>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Part of the request the field belongs to
    pub location: Location,
    /// Field name (supports nested: "item.name")
    pub field: String,
    /// Violation kind (e.g. "missing_field", "type_mismatch")
    pub kind: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl FieldError {
    pub fn new(
        location: Location,
        field: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            field: field.into(),
            kind: kind.into(),
            message: message.into(),
            params: None,
        }
    }
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_type: error_type.into(),
            message: message.into(),
            fields: None,
            internal: None,
        }
    }

    /// Create a validation error with field details
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error_type: "validation_error".to_string(),
            message: "Request validation failed".to_string(),
            fields: Some(fields),
            internal: None,
        }
    }

    /// Create a validation error from schema violations found at `location`
    pub fn from_validation(location: Location, err: ValidationError) -> Self {
        let fields = err
            .violations
            .into_iter()
            .map(|v| FieldError {
                location,
                field: v.field,
                kind: v.kind.as_str().to_string(),
                message: v.message,
                params: if v.params.is_empty() { None } else { Some(v.params) },
            })
            .collect();

        Self::validation(fields)
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Create a 405 Method Not Allowed error
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", message)
    }

    /// Create a 413 Payload Too Large error
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            format!("Request body exceeds the {limit} byte limit"),
        )
    }

    /// Create a 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// Add internal details (logged, never part of the response)
    pub fn with_internal(mut self, details: impl Into<String>) -> Self {
        self.internal = Some(details.into());
        self
    }
}

impl ApiError {
    /// Combine the rejections of several extractors into one error
    ///
    /// The first non-validation error wins. Otherwise the field lists of
    /// every 422 are concatenated in order.
    pub(crate) fn merge(errors: Vec<ApiError>) -> Option<ApiError> {
        if let Some(pos) = errors
            .iter()
            .position(|e| e.status != StatusCode::UNPROCESSABLE_ENTITY)
        {
            return errors.into_iter().nth(pos);
        }

        let mut errors = errors.into_iter();
        let mut merged = errors.next()?;
        for err in errors {
            merged
                .fields
                .get_or_insert_with(Vec::new)
                .extend(err.fields.unwrap_or_default());
        }
        Some(merged)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

/// JSON representation of API error response
#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            error: ErrorBody {
                error_type: err.error_type,
                message: err.message,
                fields: err.fields,
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastitems_validate::Violation;

    #[test]
    fn validation_carries_location() {
        let err = ApiError::from_validation(
            Location::Body,
            ValidationError::new(vec![
                Violation::missing("name"),
                Violation::type_mismatch("price", "float", "string"),
            ]),
        );

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields = err.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].location, Location::Body);
        assert_eq!(fields[0].kind, "missing_field");
        assert!(fields[0].params.is_none());
        assert_eq!(fields[1].params.as_ref().unwrap()["expected"], "float");
    }

    #[test]
    fn error_response_shape() {
        let body = ErrorResponse::from(
            ApiError::validation(vec![FieldError::new(Location::Query, "skip", "type_mismatch", "bad")])
                .with_internal("hidden"),
        );
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"]["type"], "validation_error");
        assert_eq!(json["error"]["fields"][0]["location"], "query");
        assert!(!json.to_string().contains("hidden"));
    }

    #[test]
    fn merge_concatenates_validation_fields() {
        let merged = ApiError::merge(vec![
            ApiError::validation(vec![FieldError::new(Location::Path, "item_id", "type_mismatch", "bad")]),
            ApiError::validation(vec![
                FieldError::new(Location::Body, "name", "constraint_violation", "max length 5"),
                FieldError::new(Location::Body, "price", "missing_field", "field required"),
            ]),
        ])
        .unwrap();

        assert_eq!(merged.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<(Location, String)> = merged
            .fields
            .unwrap()
            .into_iter()
            .map(|f| (f.location, f.field))
            .collect();
        assert_eq!(
            fields,
            vec![
                (Location::Path, "item_id".to_string()),
                (Location::Body, "name".to_string()),
                (Location::Body, "price".to_string()),
            ]
        );
    }

    #[test]
    fn merge_prefers_non_validation_errors() {
        let merged = ApiError::merge(vec![
            ApiError::validation(vec![FieldError::new(Location::Path, "item_id", "type_mismatch", "bad")]),
            ApiError::bad_request("Invalid JSON: eof"),
        ])
        .unwrap();
        assert_eq!(merged.status, StatusCode::BAD_REQUEST);
        assert!(merged.fields.is_none());

        assert!(ApiError::merge(Vec::new()).is_none());
    }

    #[test]
    fn invalid_json_is_bad_request() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.starts_with("Invalid JSON"));
    }
}
