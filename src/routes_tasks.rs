// --------------------------------------------------
// Handles API endpoints for task-template CRUD.
//
// Responsibilities:
// - Create / read / update / delete task templates
// - Toggle completion on one-off tasks
//
// Handlers only move data between HTTP and the store;
// every scheduling decision lives in the core.
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ScheduleError;
use crate::models::Task;
use crate::store::NewTask;

// -----------------------------
// GET /api/tasks
// Returns every task template.
// -----------------------------
pub async fn get_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.lock().tasks().to_vec())
}

// -----------------------------
// POST /api/tasks
// Creates a new task template.
// -----------------------------
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewTask>,
) -> Result<impl IntoResponse, ScheduleError> {
    let task = state.lock().add_task(input)?;
    tracing::info!(task = %task.name, id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

// -----------------------------
// PUT /api/tasks/:id
// Updates an existing template by ID; the new snapshot cascades into
// the displayed day's placements.
// -----------------------------
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewTask>,
) -> Result<Json<Task>, ScheduleError> {
    let task = state.lock().update_task(id, input)?;
    Ok(Json(task))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a template and its placements on the displayed day.
// -----------------------------
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ScheduleError> {
    state.lock().delete_task(id)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Flips completion on a one-off task.
// -----------------------------
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ScheduleError> {
    let task = state.lock().toggle_complete(id)?;
    Ok(Json(task))
}
