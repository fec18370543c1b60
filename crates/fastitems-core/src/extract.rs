//! Extractors for fastitems
//!
//! Extractors parse and validate data from incoming requests. Failures are
//! returned as [`ApiError`]s and short-circuit the handler.

use crate::error::{ApiError, FieldError, Location, Result};
use crate::request::Request;
use crate::response::Json;
use fastitems_validate::{Model, ValidationError, Violation, ROOT_FIELD};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ops::Deref;
use std::str::FromStr;
use tracing::debug;

/// Trait for extracting data from request parts (path, query, headers)
pub trait FromRequestParts: Sized {
    /// Extract from request parts
    fn from_request_parts(req: &Request) -> Result<Self>;
}

/// Trait for extracting data from the full request (including body)
pub trait FromRequest: Sized {
    /// Extract from the full request
    fn from_request(req: &mut Request) -> Result<Self>;
}

// Blanket impl: FromRequestParts -> FromRequest
impl<T: FromRequestParts> FromRequest for T {
    fn from_request(req: &mut Request) -> Result<Self> {
        T::from_request_parts(req)
    }
}

fn take_json(req: &mut Request) -> Result<Option<Value>> {
    let body = req
        .take_body()
        .ok_or_else(|| ApiError::internal("Body already consumed"))?;

    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&body)?))
}

/// Raw JSON body extractor, deserialized with serde only
impl<T: DeserializeOwned> FromRequest for Json<T> {
    fn from_request(req: &mut Request) -> Result<Self> {
        let value = take_json(req)?.unwrap_or(Value::Null);
        let parsed = serde_json::from_value(value)?;
        Ok(Json(parsed))
    }
}

/// Schema-validated JSON body extractor
///
/// The body is decoded as JSON and run through `T::schema()`. Every
/// violation is reported at once as a 422 with location `body`.
///
/// ```rust,ignore
/// async fn create_item(Valid(item): Valid<Item>) -> Json<Item> {
///     Json(item)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

impl<T: Model> FromRequest for Valid<T> {
    fn from_request(req: &mut Request) -> Result<Self> {
        let value = match take_json(req)? {
            Some(value) => value,
            None => {
                return Err(ApiError::from_validation(
                    Location::Body,
                    ValidationError::single(Violation::missing(ROOT_FIELD)),
                ))
            }
        };

        T::from_json(&value).map(Valid).map_err(|err| {
            debug!(schema = %T::schema().name, violations = err.len(), "request body rejected");
            ApiError::from_validation(Location::Body, err)
        })
    }
}

impl<T> Deref for Valid<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Schema-validated query string extractor
///
/// Query values arrive as strings; the schema coerces them to the declared
/// types. A repeated key keeps its last value.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T: Model> FromRequestParts for ValidQuery<T> {
    fn from_request_parts(req: &Request) -> Result<Self> {
        let query = req.query_string().unwrap_or("");
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?;

        let input: Map<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        T::schema()
            .validate(&input)
            .and_then(|record| T::from_record(&record))
            .map(ValidQuery)
            .map_err(|err| {
                debug!(schema = %T::schema().name, violations = err.len(), "query string rejected");
                ApiError::from_validation(Location::Query, err)
            })
    }
}

impl<T> Deref for ValidQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Raw query string extractor, deserialized with serde_urlencoded only
#[derive(Debug, Clone)]
pub struct Query<T>(pub T);

impl<T: DeserializeOwned> FromRequestParts for Query<T> {
    fn from_request_parts(req: &Request) -> Result<Self> {
        let query = req.query_string().unwrap_or("");
        serde_urlencoded::from_str(query)
            .map(Query)
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))
    }
}

impl<T> Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Path parameter extractor
///
/// Parses the first path parameter of the matched route.
///
/// For route `/items/{item_id}`:
///
/// ```rust,ignore
/// async fn get_item(Path(item_id): Path<i64>) -> impl IntoResponse {
///     // item_id is extracted from path
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Path<T>(pub T);

impl<T: FromStr> FromRequestParts for Path<T>
where
    T::Err: std::fmt::Display,
{
    fn from_request_parts(req: &Request) -> Result<Self> {
        let (name, value) = req
            .path_params()
            .first()
            .ok_or_else(|| ApiError::internal("Missing path parameter"))?;

        value.parse::<T>().map(Path).map_err(|e| {
            ApiError::validation(vec![FieldError::new(
                Location::Path,
                name.clone(),
                "type_mismatch",
                format!("invalid path parameter: {}", e),
            )])
        })
    }
}

impl<T> Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use fastitems_validate::{FieldSpec, FieldType, Schema};
    use http::StatusCode;
    use serde::Deserialize;
    use std::sync::OnceLock;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Page {
        skip: i64,
        tag: Option<String>,
    }

    impl Model for Page {
        fn schema() -> &'static Schema {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::new("Page")
                    .field(FieldSpec::with_default("skip", FieldType::Integer, 0))
                    .field(FieldSpec::optional("tag", FieldType::Text).max_length(3))
            })
        }
    }

    fn request(uri: &str, body: &str, params: &[(&str, &str)]) -> Request {
        let (parts, ()) = http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        let params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Request::new(parts, Bytes::from(body.to_string()), params)
    }

    #[test]
    fn valid_body() {
        let mut req = request("/", r#"{"skip": "3", "tag": "ab"}"#, &[]);
        let Valid(page) = Valid::<Page>::from_request(&mut req).unwrap();
        assert_eq!(
            page,
            Page {
                skip: 3,
                tag: Some("ab".into())
            }
        );
    }

    #[test]
    fn invalid_body_reports_every_field() {
        let mut req = request("/", r#"{"skip": "x", "tag": "abcd"}"#, &[]);
        let err = Valid::<Page>::from_request(&mut req).unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields = err.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.location == Location::Body));
    }

    #[test]
    fn empty_body_is_missing() {
        let mut req = request("/", "", &[]);
        let err = Valid::<Page>::from_request(&mut req).unwrap_err();
        let fields = err.fields.unwrap();
        assert_eq!(fields[0].field, ROOT_FIELD);
        assert_eq!(fields[0].kind, "missing_field");
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let mut req = request("/", "{not json", &[]);
        let err = Valid::<Page>::from_request(&mut req).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn raw_json_body() {
        let mut req = request("/", r#"{"x": 1}"#, &[]);
        let Json(value) = Json::<Value>::from_request(&mut req).unwrap();
        assert_eq!(value["x"], 1);

        assert!(Json::<Value>::from_request(&mut req).is_err());
    }

    #[test]
    fn query_defaults_and_coercion() {
        let req = request("/items/?tag=a%20b", "", &[]);
        let ValidQuery(page) = ValidQuery::<Page>::from_request_parts(&req).unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.tag.as_deref(), Some("a b"));

        let req = request("/items/?skip=1&skip=5", "", &[]);
        let ValidQuery(page) = ValidQuery::<Page>::from_request_parts(&req).unwrap();
        assert_eq!(page.skip, 5);
    }

    #[test]
    fn query_violation_location() {
        let req = request("/items/?skip=ten", "", &[]);
        let err = ValidQuery::<Page>::from_request_parts(&req).unwrap_err();
        let fields = err.fields.unwrap();
        assert_eq!(fields[0].location, Location::Query);
        assert_eq!(fields[0].field, "skip");
    }

    #[test]
    fn raw_query() {
        #[derive(Debug, Deserialize)]
        struct Search {
            q: String,
        }

        let req = request("/?q=rust", "", &[]);
        let Query(search) = Query::<Search>::from_request_parts(&req).unwrap();
        assert_eq!(search.q, "rust");

        let req = request("/", "", &[]);
        let err = Query::<Search>::from_request_parts(&req).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn path_param_parsing() {
        let req = request("/items/42", "", &[("item_id", "42")]);
        let Path(id) = Path::<i64>::from_request_parts(&req).unwrap();
        assert_eq!(id, 42);

        let req = request("/items/abc", "", &[("item_id", "abc")]);
        let err = Path::<i64>::from_request_parts(&req).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields = err.fields.unwrap();
        assert_eq!(fields[0].location, Location::Path);
        assert_eq!(fields[0].field, "item_id");
    }
}
