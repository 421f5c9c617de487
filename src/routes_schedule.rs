// --------------------------------------------------
// Handles API endpoints for the day timeline.
//
// Responsibilities:
// - Switch the displayed day and return its materialized schedule
// - Place task templates and one-off / recurring appointments
// - Two-step delete flow for schedule entries
// --------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ScheduleError;
use crate::logic::{self, CategoryShare};
use crate::models::{RecurringAppointment, ScheduledTask, Task};
use crate::store::{DeleteKind, NewAppointment};
use crate::timeutil::{parse_date_key, weekday_index};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String, // "YYYY-MM-DD"
}

/// Everything the presentation layer renders for one day.
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub weekday: u8,
    pub tasks: Vec<Task>,
    pub schedule: Vec<ScheduledTask>,
    pub recurring: Vec<RecurringAppointment>,
    pub day_counts: HashMap<String, usize>,
    pub breakdown: Vec<CategoryShare>,
}

// -----------------------------
// GET /api/day?date=YYYY-MM-DD
// Switches the displayed day (flushing the outgoing one) and returns
// its materialized, collision-resolved schedule.
// -----------------------------
pub async fn get_day(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayResponse>, ScheduleError> {
    let date =
        parse_date_key(&q.date).ok_or_else(|| ScheduleError::InvalidDate(q.date.clone()))?;

    let mut store = state.lock();
    store.set_display_date(date);
    let schedule = store.schedule();
    let breakdown = logic::category_breakdown(&schedule);

    Ok(Json(DayResponse {
        date: q.date,
        weekday: weekday_index(date),
        tasks: store.tasks().to_vec(),
        schedule,
        recurring: store.recurring().to_vec(),
        day_counts: store.day_activity_counts(),
        breakdown,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PlaceTaskInput {
    pub task_id: Uuid,
    pub start_hour: f64,
}

// -----------------------------
// POST /api/schedule
// Drag-drop placement of a task template onto the timeline.
// -----------------------------
pub async fn place_task(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PlaceTaskInput>,
) -> Result<impl IntoResponse, ScheduleError> {
    let entry = state.lock().schedule_task(input.task_id, input.start_hour)?;
    tracing::info!(
        task = %entry.task.name,
        start_hour = entry.start_hour,
        "task placed on timeline"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

// -----------------------------
// POST /api/appointments
// One-off or weekly appointment from the form flow.
// -----------------------------
pub async fn add_appointment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAppointment>,
) -> Result<impl IntoResponse, ScheduleError> {
    let outcome = state.lock().add_appointment(input)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[derive(Debug, Serialize)]
pub struct DeleteRequestResponse {
    pub kind: DeleteKind,
}

// -----------------------------
// POST /api/schedule/:id/delete-request
// First step of the delete flow: what would this id remove?
// -----------------------------
pub async fn request_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteRequestResponse>, ScheduleError> {
    let kind = state
        .lock()
        .request_delete(id)
        .ok_or(ScheduleError::UnknownEntry(id))?;
    Ok(Json(DeleteRequestResponse { kind }))
}

// -----------------------------
// DELETE /api/schedule/:id
// Second step: confirmed removal. A recurring master vanishes from
// every day at once.
// -----------------------------
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ScheduleError> {
    let kind = state.lock().confirm_delete(id)?;
    Ok(Json(serde_json::json!({ "ok": true, "kind": kind })))
}
