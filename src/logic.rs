/*
Collision detection and per-day materialization.
Module is independent from HTTP / storage so it can be tested directly.
*/

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ScheduleError;
use crate::models::{Category, RecurringAppointment, ScheduledTask};
use crate::timeutil::{HOURS_PER_DAY, weekday_index};

// Two half-open intervals [s1, e1) and [s2, e2) overlap iff
// s1 < e2 AND e1 > s2. Touching edges (e1 == s2) do not collide.
pub fn overlaps(s1: f64, e1: f64, s2: f64, e2: f64) -> bool {
    s1 < e2 && e1 > s2
}

/// First existing entry the candidate interval would collide with.
pub fn find_collision<'a>(
    start: f64,
    end: f64,
    existing: &'a [ScheduledTask],
) -> Option<&'a ScheduledTask> {
    existing
        .iter()
        .find(|st| overlaps(start, end, st.start_hour, st.end_hour()))
}

// Input errors are rejected before any collision test runs.
fn check_bounds(start: f64, end: f64) -> Result<(), ScheduleError> {
    if end <= start {
        return Err(ScheduleError::EndBeforeStart);
    }
    if start < 0.0 {
        return Err(ScheduleError::StartOutOfRange(start));
    }
    if end > HOURS_PER_DAY {
        return Err(ScheduleError::TimeBoundsExceeded { end });
    }
    Ok(())
}

/// Gate for every placement on a day timeline. No side effects; a
/// rejection leaves the candidate unplaced and the day unchanged.
pub fn check_placement(
    start: f64,
    end: f64,
    existing: &[ScheduledTask],
) -> Result<(), ScheduleError> {
    check_bounds(start, end)?;
    if let Some(hit) = find_collision(start, end, existing) {
        return Err(ScheduleError::Overlap {
            start: hit.start_hour,
            end: hit.end_hour(),
        });
    }
    Ok(())
}

/// Same gate for a weekly slot, checked against the recurring
/// appointments sharing the weekday.
pub fn check_recurring_slot(
    start: f64,
    end: f64,
    day_of_week: u8,
    existing: &[RecurringAppointment],
) -> Result<(), ScheduleError> {
    check_bounds(start, end)?;
    if let Some(hit) = existing
        .iter()
        .filter(|ra| ra.day_of_week == day_of_week)
        .find(|ra| overlaps(start, end, ra.start_hour, ra.end_hour()))
    {
        return Err(ScheduleError::Overlap {
            start: hit.start_hour,
            end: hit.end_hour(),
        });
    }
    Ok(())
}

/// Effective schedule for one day: the persisted single-day entries plus
/// the projection of every recurring appointment falling on this weekday.
///
/// A projection that collides with a single-day entry is dropped for this
/// day only — the one-off entry wins and the recurring master stays in
/// the store. Always recomputed on navigation, never cached.
pub fn materialize(
    date: NaiveDate,
    day_tasks: &[ScheduledTask],
    recurring: &[RecurringAppointment],
) -> Vec<ScheduledTask> {
    let weekday = weekday_index(date);
    let mut result: Vec<ScheduledTask> = day_tasks.to_vec();

    for appointment in recurring.iter().filter(|ra| ra.day_of_week == weekday) {
        let occurrence = appointment.occurrence();
        if let Some(hit) = find_collision(occurrence.start_hour, occurrence.end_hour(), day_tasks)
        {
            tracing::debug!(
                appointment = %appointment.name,
                blocked_by = %hit.task.name,
                "recurring occurrence suppressed for this day"
            );
            continue;
        }
        result.push(occurrence);
    }

    // Stable sort keeps single-day entries ahead of projections on ties.
    result.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));
    result
}

/// Total hours per category across a day, in first-appearance order.
/// Feeds the report pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub color: String,
    pub hours: f64,
}

pub fn category_breakdown(schedule: &[ScheduledTask]) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = Vec::new();
    for st in schedule {
        match shares.iter_mut().find(|s| s.category == st.task.category) {
            Some(share) => share.hours += st.task.duration,
            None => shares.push(CategoryShare {
                category: st.task.category,
                color: st.task.color.clone(),
                hours: st.task.duration,
            }),
        }
    }
    shares
}
