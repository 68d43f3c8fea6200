//! HTTP + JSON API over a SQLite task table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::ApiError;
pub use routes::{api_router, app, AppState};
pub use store::{StoreError, TaskChanges, TaskStore};
