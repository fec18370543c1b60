//! Router implementation using radix tree (matchit)
//!
//! # Path Patterns
//!
//! - `/items` - Static path
//! - `/items/{item_id}` - Single parameter
//! - `/files/{*file_path}` - Catch-all, matches the rest of the path
//!
//! ```rust,ignore
//! let router = Router::new()
//!     .route("/items", get(list_items).post(create_item))
//!     .route("/items/{item_id}", put(update_item));
//! ```
//!
//! Registering the same pattern twice, or two patterns that matchit cannot
//! tell apart, panics with a [`RouteConflictError`].

use crate::handler::{into_boxed_handler, BoxedHandler, Handler};
use http::Method;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;

/// Error returned when a route conflict is detected
#[derive(Debug, Clone)]
pub struct RouteConflictError {
    /// The path that was being registered
    pub new_path: String,
    /// The existing path that conflicts
    pub existing_path: String,
    /// Detailed error message from the underlying router
    pub details: String,
}

impl std::fmt::Display for RouteConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "route conflict detected")?;
        writeln!(f, "    existing: {}", self.existing_path)?;
        writeln!(f, "    new:      {}", self.new_path)?;
        write!(f, "    details:  {}", self.details)
    }
}

impl std::error::Error for RouteConflictError {}

/// HTTP method router for a single path
#[derive(Clone, Default)]
pub struct MethodRouter {
    handlers: HashMap<Method, BoxedHandler>,
}

impl MethodRouter {
    /// Create a new empty method router
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for a specific method
    ///
    /// Panics if the method is already registered.
    pub fn on<H, T>(mut self, method: Method, handler: H) -> Self
    where
        H: Handler<T>,
        T: 'static,
    {
        if self.handlers.contains_key(&method) {
            panic!("Duplicate handler for method {} on the same path", method.as_str());
        }
        self.handlers.insert(method, into_boxed_handler(handler));
        self
    }

    pub fn get<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::GET, handler)
    }

    pub fn post<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::POST, handler)
    }

    pub fn put<H: Handler<T>, T: 'static>(self, handler: H) -> Self {
        self.on(Method::PUT, handler)
    }

    pub(crate) fn get_handler(&self, method: &Method) -> Option<&BoxedHandler> {
        self.handlers.get(method)
    }

    /// Allowed methods for a 405 response, sorted for a stable `Allow` header
    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.handlers.keys().cloned().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}

/// Create a GET route handler
pub fn get<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().get(handler)
}

/// Create a POST route handler
pub fn post<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().post(handler)
}

/// Create a PUT route handler
pub fn put<H: Handler<T>, T: 'static>(handler: H) -> MethodRouter {
    MethodRouter::new().put(handler)
}

/// Main router
pub struct Router {
    inner: MatchitRouter<MethodRouter>,
    /// Original patterns keyed by matchit path, for conflict messages
    registered_routes: HashMap<String, String>,
}

impl Router {
    /// Create a new router
    pub fn new() -> Self {
        Self {
            inner: MatchitRouter::new(),
            registered_routes: HashMap::new(),
        }
    }

    /// Add a route
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        let matchit_path = convert_path_params(path);

        if let Err(e) = self.inner.insert(matchit_path.clone(), method_router) {
            let normalized = normalize_path_for_comparison(&matchit_path);
            let existing_path = self
                .registered_routes
                .iter()
                .find(|(k, _)| normalize_path_for_comparison(k) == normalized)
                .map(|(_, original)| original.clone())
                .unwrap_or_else(|| "<unknown>".to_string());

            let conflict = RouteConflictError {
                new_path: path.to_string(),
                existing_path,
                details: e.to_string(),
            };
            panic!("{}", conflict);
        }

        self.registered_routes.insert(matchit_path, path.to_string());
        self
    }

    /// Original patterns of every registered route
    pub fn registered_routes(&self) -> impl Iterator<Item = &str> {
        self.registered_routes.values().map(String::as_str)
    }

    /// Match a request and return the handler + params
    pub(crate) fn match_route(&self, path: &str, method: &Method) -> RouteMatch<'_> {
        match self.inner.at(path) {
            Ok(matched) => {
                let method_router = matched.value;

                if let Some(handler) = method_router.get_handler(method) {
                    let params = matched
                        .params
                        .iter()
                        .map(|(k, v)| (k.to_string(), decode_param(v)))
                        .collect();

                    RouteMatch::Found { handler, params }
                } else {
                    RouteMatch::MethodNotAllowed {
                        allowed: method_router.allowed_methods(),
                    }
                }
            }
            Err(_) => RouteMatch::NotFound,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of route matching
pub(crate) enum RouteMatch<'a> {
    Found {
        handler: &'a BoxedHandler,
        params: Vec<(String, String)>,
    },
    NotFound,
    MethodNotAllowed {
        allowed: Vec<Method>,
    },
}

/// Percent-decode a captured value; invalid UTF-8 becomes U+FFFD
fn decode_param(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

/// Convert `{param}` to `:param` and `{*rest}` to `*rest` for matchit
fn convert_path_params(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    result.push('*');
                } else {
                    result.push(':');
                }
            }
            '}' => {}
            _ => result.push(ch),
        }
    }

    result
}

/// Replace parameter names with a placeholder so `/a/:x` and `/a/:y` compare equal
fn normalize_path_for_comparison(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut in_param = false;

    for ch in path.chars() {
        match ch {
            ':' | '*' => {
                in_param = true;
                result.push(ch);
                result.push('_');
            }
            '/' => {
                in_param = false;
                result.push('/');
            }
            _ if in_param => {}
            _ => result.push(ch),
        }
    }

    result
}
