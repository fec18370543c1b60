//! Response types for fastitems
//!
//! | Type | Status | Content-Type |
//! |------|--------|--------------|
//! | `String` / `&str` | 200 | text/plain |
//! | `StatusCode` | that code | - |
//! | [`Json<T>`] | 200 | application/json |
//! | `(StatusCode, R)` | that code | from `R` |
//! | [`ApiError`] | varies | application/json |

use crate::error::{ApiError, ErrorResponse};
use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

/// HTTP Response type
pub type Response = http::Response<Full<Bytes>>;

/// Trait for types that can be converted into an HTTP response
pub trait IntoResponse {
    /// Convert self into a Response
    fn into_response(self) -> Response;
}

fn with_body(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Some(ct) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(ct));
    }
    response
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        with_body(StatusCode::OK, Some("text/plain; charset=utf-8"), Bytes::from(self))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        with_body(StatusCode::OK, Some("text/plain; charset=utf-8"), Bytes::from(self))
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        with_body(self, None, Bytes::new())
    }
}

// (StatusCode, impl IntoResponse)
impl<R: IntoResponse> IntoResponse for (StatusCode, R) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(internal) = &self.internal {
            error!(error_type = %self.error_type, details = %internal, "{}", self.message);
        }

        let status = self.status;
        let body = serde_json::to_vec(&ErrorResponse::from(self)).unwrap_or_else(|_| {
            br#"{"error":{"type":"internal_error","message":"Failed to serialize error"}}"#.to_vec()
        });

        with_body(status, Some("application/json"), Bytes::from(body))
    }
}

/// JSON body, both as a response and as a raw (schema-less) extractor
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => with_body(StatusCode::OK, Some("application/json"), Bytes::from(body)),
            Err(err) => ApiError::internal("Failed to serialize response")
                .with_internal(err.to_string())
                .into_response(),
        }
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
