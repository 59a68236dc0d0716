use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRef, Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateTaskRequest, UpdateTaskRequest},
    repo_types::Task,
    services::TaskService,
};
use crate::{auth::AuthUser, error::Result, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: std::result::Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>)> {
    let Json(payload) = payload?;
    let task = TaskService::from_ref(&state)
        .create(caller, &payload.task)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<Task>>> {
    let tasks = TaskService::from_ref(&state).list(caller).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let task = TaskService::from_ref(&state)
        .update(caller, id, &payload.task, payload.completed)
        .await?;
    Ok(Json(task))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    caller: AuthUser,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    TaskService::from_ref(&state).delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
