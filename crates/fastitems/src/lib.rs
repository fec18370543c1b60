//! # fastitems
//!
//! A small item service: every request body and query string is checked
//! against a declarative schema before a handler sees it.
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! fastitems::logging::init(&config);
//! fastitems::app(&config).run(&config.addr()).await?;
//! ```

pub mod config;
pub mod db;
pub mod handlers;
pub mod logging;
pub mod models;

use config::AppConfig;
use fastitems_core::{get, put, App};
use handlers::*;

/// Build the application with every route registered.
pub fn app(config: &AppConfig) -> App {
    App::new()
        .body_limit(config.body_limit)
        .route("/", get(read_root))
        .route("/some-parameter/{edad}", get(some_parameter))
        .route("/files/", get(read_empty_file_path))
        .route("/files/{*file_path}", get(read_file))
        .route("/items/", get(list_items))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{item_id}", put(update_item))
        .route("/test/items/{item_id}", put(update_item_with_query))
        .route("/multiple/items/{item_id}", put(update_item_and_user))
        .route("/add-body/items/{item_id}", put(update_item_with_importance))
}
