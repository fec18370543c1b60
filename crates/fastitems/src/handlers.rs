//! Endpoint handlers.

use crate::db::{self, FakeItem};
use crate::models::{
    Item, ItemAndUser, ItemUpdateQuery, ItemUserImportance, OptionalQuery, Pagination, User,
};
use fastitems_core::{ApiError, IntoResponse, Json, Path, Response, Result, Valid, ValidQuery};
use http::StatusCode;
use serde::Serialize;
use serde_json::value::RawValue;
use tracing::debug;

/// Greeting returned by the root route and the age check.
#[derive(Debug, Serialize)]
pub struct Mensaje {
    #[serde(rename = "Mensaje")]
    pub mensaje: &'static str,
    pub estado: bool,
    /// Age as a JSON integer of any size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edad: Option<Box<RawValue>>,
}

pub async fn read_root() -> Json<Mensaje> {
    Json(Mensaje {
        mensaje: "Raiz de la ruta",
        estado: true,
        edad: None,
    })
}

/// Age gate: 200 for adults, 403 otherwise.
///
/// Any non-empty run of ASCII digits is an age, however long; anything else
/// is a 400.
pub async fn some_parameter(Path(edad): Path<String>) -> Result<Response> {
    let digits = parse_age(&edad).ok_or_else(|| {
        debug!(edad = %edad, "rejected age parameter");
        ApiError::bad_request("Valor no permitido")
    })?;
    let adult = is_adult(&digits);
    let edad = RawValue::from_string(digits).map_err(|e| {
        ApiError::internal("Failed to encode age").with_internal(e.to_string())
    })?;

    let response = if adult {
        Json(Mensaje {
            mensaje: "Eres mayor de edad",
            estado: true,
            edad: Some(edad),
        })
        .into_response()
    } else {
        (
            StatusCode::FORBIDDEN,
            Json(Mensaje {
                mensaje: "No puede pasar porque no eres mayor de edad",
                estado: false,
                edad: Some(edad),
            }),
        )
            .into_response()
    };
    Ok(response)
}

/// Canonical decimal text of an age: ASCII digits without leading zeros.
fn parse_age(raw: &str) -> Option<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = raw.trim_start_matches('0');
    Some(if digits.is_empty() { "0" } else { digits }.to_string())
}

fn is_adult(digits: &str) -> bool {
    digits.len() > 2 || digits.parse::<u8>().map_or(false, |n| n >= 18)
}

#[derive(Debug, Serialize)]
pub struct FilePath {
    pub file_path: String,
}

pub async fn read_file(Path(file_path): Path<String>) -> Json<FilePath> {
    Json(FilePath { file_path })
}

/// `/files/` itself: the path is empty.
pub async fn read_empty_file_path() -> Json<FilePath> {
    Json(FilePath {
        file_path: String::new(),
    })
}

pub async fn list_items(ValidQuery(page): ValidQuery<Pagination>) -> Json<&'static [FakeItem]> {
    Json(db::page(page.skip, page.limit))
}

pub async fn create_item(Valid(item): Valid<Item>) -> Json<Item> {
    Json(item)
}

/// An item flattened next to its id, with an optional echoed query.
#[derive(Debug, Serialize)]
pub struct ItemWithId {
    pub item_id: i64,
    #[serde(flatten)]
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

pub async fn update_item(Path(item_id): Path<i64>, Valid(item): Valid<Item>) -> Json<ItemWithId> {
    Json(ItemWithId {
        item_id,
        item,
        q: None,
    })
}

pub async fn update_item_with_query(
    Path(item_id): Path<i64>,
    Valid(item): Valid<Item>,
    ValidQuery(query): ValidQuery<ItemUpdateQuery>,
) -> Json<ItemWithId> {
    Json(ItemWithId {
        item_id,
        item,
        q: non_empty(query.q),
    })
}

#[derive(Debug, Serialize)]
pub struct ItemUserUpdate {
    pub item_id: i64,
    pub item: Item,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

pub async fn update_item_and_user(
    Path(item_id): Path<i64>,
    Valid(body): Valid<ItemAndUser>,
) -> Json<ItemUserUpdate> {
    Json(ItemUserUpdate {
        item_id,
        item: body.item,
        user: body.user,
        importance: None,
        q: None,
    })
}

pub async fn update_item_with_importance(
    Path(item_id): Path<i64>,
    Valid(body): Valid<ItemUserImportance>,
    ValidQuery(query): ValidQuery<OptionalQuery>,
) -> Json<ItemUserUpdate> {
    Json(ItemUserUpdate {
        item_id,
        item: body.item,
        user: body.user,
        importance: Some(body.importance),
        q: non_empty(query.q),
    })
}

/// An empty query value is echoed the same as a missing one.
fn non_empty(q: Option<String>) -> Option<String> {
    q.filter(|q| !q.is_empty())
}
