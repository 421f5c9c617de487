//! Scheduling core for a personal day planner: reusable task templates
//! placed on a 24-hour timeline, weekly recurring appointments,
//! half-open-interval collision detection, and per-day materialization
//! that merges the two.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod error;
pub mod logic;
pub mod models;
pub mod routes_schedule;
pub mod routes_tasks;
pub mod store;
pub mod timeutil;

use store::ScheduleStore;

/// Shared handler state: the schedule store behind a mutex, so
/// mutations apply one at a time with no partial states observable.
pub struct AppState {
    store: Mutex<ScheduleStore>,
}

impl AppState {
    pub fn new(store: ScheduleStore) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }

    /// A poisoned lock is recovered rather than propagated; mutations
    /// validate before touching state, so the data is still consistent.
    pub fn lock(&self) -> MutexGuard<'_, ScheduleStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
