//! Application builder

use crate::error::ApiError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::{MethodRouter, RouteMatch, Router};
use crate::server::{self, ServerError};
use bytes::Bytes;
use http::{header, HeaderValue, Method, StatusCode};
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, warn};

/// Default request body limit (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Main application builder
///
/// ```rust,ignore
/// App::new()
///     .route("/", get(read_root))
///     .route("/items/{item_id}", put(update_item))
///     .run("127.0.0.1:8000")
///     .await
/// ```
pub struct App {
    router: Router,
    body_limit: usize,
}

impl App {
    /// Create an application with no routes
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Register a route (see [`Router::route`])
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Set the maximum accepted request body size in bytes
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn get_body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch one fully collected request through the router
    ///
    /// Shared by the hyper server and [`TestClient`](crate::TestClient).
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let start = Instant::now();
        let (parts, body) = req.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();

        let response = if body.len() > self.body_limit {
            ApiError::payload_too_large(self.body_limit).into_response()
        } else {
            match self.router.match_route(&path, &method) {
                RouteMatch::Found { handler, params } => {
                    handler(Request::new(parts, body, params)).await
                }
                RouteMatch::NotFound => {
                    ApiError::not_found(format!("No route found for {} {}", method, path))
                        .into_response()
                }
                RouteMatch::MethodNotAllowed { allowed } => {
                    method_not_allowed(&method, &path, &allowed)
                }
            }
        };

        log_request(&method, &path, response.status(), start);
        response
    }

    /// Run the server until Ctrl-C
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        self.run_with_shutdown(addr, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the server until `signal` resolves
    pub async fn run_with_shutdown<F>(self, addr: &str, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        server::serve(self, addr, signal).await
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn method_not_allowed(method: &Method, path: &str, allowed: &[Method]) -> Response {
    let allowed_str: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
    let mut response = ApiError::method_not_allowed(format!(
        "Method {} not allowed for {}",
        method, path
    ))
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&allowed_str.join(", ")) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

/// Log request completion
pub(crate) fn log_request(method: &Method, path: &str, status: StatusCode, start: Instant) {
    let elapsed = start.elapsed();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request completed"
        );
    }
}
