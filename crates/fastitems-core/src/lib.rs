//! # fastitems core
//!
//! Thin HTTP plumbing for the fastitems service: a hyper server, a
//! matchit-backed router, extractors that feed request data through
//! `fastitems-validate` schemas, and a JSON error envelope.

mod app;
mod error;
mod extract;
mod handler;
mod request;
mod response;
mod router;
mod server;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use app::{App, DEFAULT_BODY_LIMIT};
pub use error::{ApiError, FieldError, Location, Result};
pub use extract::{FromRequest, FromRequestParts, Path, Query, Valid, ValidQuery};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::{get, post, put, MethodRouter, RouteConflictError, Router};
pub use server::ServerError;
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
