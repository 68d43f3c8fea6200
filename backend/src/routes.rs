use std::path::Path;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{batch_delete_tasks, create_task, delete_task, list_tasks, update_task};
use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }
}

/// The JSON API alone.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(list_tasks).post(create_task))
        .route("/api/todos/batch-delete", post(batch_delete_tasks))
        .route("/api/todos/:id", put(update_task).delete(delete_task))
        .with_state(state)
}

/// The full application: API, static client assets for every other path, CORS and request tracing.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
