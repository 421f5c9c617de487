use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Everything a mutation can be rejected with. Rejections are
/// synchronous and leave the store untouched; the caller corrects the
/// input and resubmits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("duration must be positive")]
    NonPositiveDuration,

    #[error("end time must be after start time")]
    EndBeforeStart,

    #[error("start hour {0} is out of range")]
    StartOutOfRange(f64),

    #[error("weekday {0} is out of range, expected 0-6")]
    InvalidWeekday(u8),

    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),

    #[error("invalid date: {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("placement runs past 24:00 (ends at {end})")]
    TimeBoundsExceeded { end: f64 },

    #[error("overlaps an existing entry occupying {start} to {end}")]
    Overlap { start: f64, end: f64 },

    #[error("no task with id {0}")]
    UnknownTask(Uuid),

    #[error("no schedule entry with id {0}")]
    UnknownEntry(Uuid),

    #[error("task {0} is not a one-off task")]
    NotOneOff(Uuid),
}

impl ScheduleError {
    fn status(&self) -> StatusCode {
        match self {
            ScheduleError::Overlap { .. } => StatusCode::CONFLICT,
            ScheduleError::UnknownTask(_) | ScheduleError::UnknownEntry(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
