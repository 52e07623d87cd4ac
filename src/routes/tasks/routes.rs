use axum::{
    extract::{Form, FromRequest, Path, Query, Request, State},
    Json,
};
use uuid::Uuid;

use super::dto::{CreateTask, Deleted};
use super::model::Task;
use crate::error::ApiError;
use crate::state::AppState;

/// Task text taken from the query string, or from an urlencoded form body.
pub struct TaskText(pub String);

impl<S> FromRequest<S> for TaskText
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Query(CreateTask { text: Some(text) })) =
            Query::<CreateTask>::try_from_uri(req.uri())
        {
            return Ok(TaskText(text));
        }

        match Form::<CreateTask>::from_request(req, state).await {
            Ok(Form(CreateTask { text: Some(text) })) => Ok(TaskText(text)),
            _ => Err(ApiError::BadRequest(
                "Missing required parameter: text".to_string(),
            )),
        }
    }
}

// Anything that is not a UUID cannot name a stored task.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::try_parse(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    TaskText(text): TaskText,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.create_task(&text).await?;
    Ok(Json(task))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list_tasks().await?;
    Ok(Json(tasks))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.complete_task(parse_id(&id)?).await?;
    Ok(Json(task))
}

pub async fn incomplete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.incomplete_task(parse_id(&id)?).await?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let deleted = state.tasks.delete_task(parse_id(&id)?).await?;
    Ok(Json(deleted))
}
