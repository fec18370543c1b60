//! Request and response models.
//!
//! Each model is a typed struct bound to a [`Schema`]; the schema is the
//! single source of what the endpoint accepts.

use fastitems_validate::{FieldSpec, FieldType, Model, Schema};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub tax: Option<f64>,
}

pub fn item_schema() -> Schema {
    Schema::new("Item")
        .field(FieldSpec::required("name", FieldType::Text).max_length(5))
        .field(FieldSpec::optional("description", FieldType::Text))
        .field(FieldSpec::required("price", FieldType::Float))
        .field(FieldSpec::optional("tax", FieldType::Float))
}

impl Model for Item {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(item_schema)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub full_name: Option<String>,
}

pub fn user_schema() -> Schema {
    Schema::new("User")
        .field(FieldSpec::required("username", FieldType::Text))
        .field(FieldSpec::optional("full_name", FieldType::Text))
}

impl Model for User {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(user_schema)
    }
}

/// Body carrying an item and a user under their own keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAndUser {
    pub item: Item,
    pub user: User,
}

impl Model for ItemAndUser {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new("ItemAndUser")
                .field(FieldSpec::required("item", FieldType::Object(item_schema())))
                .field(FieldSpec::required("user", FieldType::Object(user_schema())))
        })
    }
}

/// Like [`ItemAndUser`] plus a scalar `importance` key in the same body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUserImportance {
    pub item: Item,
    pub user: User,
    pub importance: i64,
}

impl Model for ItemUserImportance {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new("ItemUserImportance")
                .field(FieldSpec::required("item", FieldType::Object(item_schema())))
                .field(FieldSpec::required("user", FieldType::Object(user_schema())))
                .field(FieldSpec::required("importance", FieldType::Integer))
        })
    }
}

/// `skip`/`limit` query parameters of the item listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Model for Pagination {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new("Pagination")
                .field(FieldSpec::with_default("skip", FieldType::Integer, 0))
                .field(FieldSpec::with_default("limit", FieldType::Integer, 20))
        })
    }
}

/// Optional free-text query, sent as `item-query` in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemUpdateQuery {
    #[serde(rename = "item-query")]
    pub q: Option<String>,
}

impl Model for ItemUpdateQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new("ItemUpdateQuery").field(FieldSpec::optional("item-query", FieldType::Text))
        })
    }
}

/// Optional free-text query `q`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionalQuery {
    pub q: Option<String>,
}

impl Model for OptionalQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| Schema::new("OptionalQuery").field(FieldSpec::optional("q", FieldType::Text)))
    }
}
