use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use todo_shared::{
    normalize_text, BatchDeleteRequest, BatchDeleteResponse, CreateTaskRequest, DeleteResponse,
    Task, UpdateTaskRequest,
};
use tracing::info;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::store::TaskChanges;

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdParam = Result<Path<i64>, PathRejection>;

fn required_text(text: Option<&str>) -> Result<String, ApiError> {
    text.and_then(normalize_text)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation("Todo text is required".to_string()))
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: JsonBody<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload?;
    let text = required_text(payload.text.as_deref())?;

    let task = state.store.create(&text).await?;
    info!(id = task.id, "todo created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    id: IdParam,
    State(state): State<AppState>,
    payload: JsonBody<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    if payload.is_empty() {
        return Err(ApiError::Validation(
            "Nothing to update: supply completed and/or text".to_string(),
        ));
    }

    let text = match payload.text.as_deref() {
        Some(raw) => Some(required_text(Some(raw))?),
        None => None,
    };

    let changes = TaskChanges {
        completed: payload.completed,
        text,
    };
    Ok(Json(state.store.update(id, changes).await?))
}

pub async fn delete_task(
    id: IdParam,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    state.store.delete(id).await?;
    info!(id, "todo deleted");

    Ok(Json(DeleteResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

pub async fn batch_delete_tasks(
    State(state): State<AppState>,
    payload: JsonBody<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, ApiError> {
    let Json(payload) = payload?;
    let outcome = state.store.delete_many(&payload.ids).await?;
    info!(
        deleted = outcome.deleted.len(),
        missing = outcome.missing.len(),
        "todos batch deleted"
    );
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text(Some("  buy milk ")).unwrap(), "buy milk");
    }

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert!(matches!(required_text(None), Err(ApiError::Validation(_))));
        assert!(matches!(
            required_text(Some("   ")),
            Err(ApiError::Validation(_))
        ));
    }
}
