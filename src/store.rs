use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::logic;
use crate::models::{Category, RecurringAppointment, ScheduledTask, Task, TaskKind, TaskSnapshot};
use crate::timeutil::{date_key, parse_hhmm, weekday_index};

pub const TASKS_KEY: &str = "tasks";
pub const RECURRING_KEY: &str = "recurringAppointments";

const SCHEDULED_PREFIX: &str = "scheduled-";

/// Storage key for one day's single-day entries.
pub fn scheduled_key(day: &str) -> String {
    format!("{SCHEDULED_PREFIX}{day}")
}

/// External persistence collaborator. Values are opaque serialized
/// records; the store decides the format.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()>;
    fn delete(&mut self, key: &str) -> io::Result<()>;
    fn list_keys(&self) -> Vec<String>;
}

/// One file per key under a data directory, written atomically through
/// a temp file so a crash mid-write cannot truncate a record.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn list_keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect()
    }
}

/// Input for AddTask / UpdateTask. Id, color and completion state are
/// assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub category: Category,
    pub duration: f64,
    #[serde(flatten)]
    pub kind: TaskKind,
}

/// Input for AddAppointment. `repeat` is the weekday to recur on, or
/// `None` for a single placement on the displayed day.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub name: String,
    pub category: Category,
    pub start_hour: f64,
    pub end_hour: f64,
    #[serde(default)]
    pub repeat: Option<u8>,
}

/// What AddAppointment produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppointmentOutcome {
    /// Placed directly on the displayed day.
    Scheduled { entry: ScheduledTask },
    /// Registered as a weekly appointment. `suppressed_today` warns that
    /// a one-off entry already occupies the slot on the displayed day,
    /// so today's occurrence will not be visible.
    Recurring {
        appointment: RecurringAppointment,
        suppressed_today: bool,
    },
}

/// Answer to a delete request, so the caller knows whether to ask
/// "delete from all days?" before confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteKind {
    SingleInstance,
    RecurringMaster,
}

/// Owns every entity collection for the process lifetime. Single-day
/// schedules are resident for the displayed day only; every other day
/// lives in the key-value store until navigated to.
pub struct ScheduleStore {
    kv: Box<dyn KvStore>,
    tasks: Vec<Task>,
    recurring: Vec<RecurringAppointment>,
    display_date: NaiveDate,
    day_tasks: Vec<ScheduledTask>,
    day_counts: HashMap<String, usize>,
}

impl ScheduleStore {
    /// Load collections from the key-value collaborator. Malformed or
    /// missing records degrade to empty collections; opening never
    /// fails on bad data.
    pub fn open(kv: Box<dyn KvStore>, today: NaiveDate) -> Self {
        let tasks: Vec<Task> = decode(kv.get(TASKS_KEY), TASKS_KEY);
        let recurring: Vec<RecurringAppointment> = decode(kv.get(RECURRING_KEY), RECURRING_KEY);
        let day_key = scheduled_key(&date_key(today));
        let day_tasks: Vec<ScheduledTask> = decode(kv.get(&day_key), &day_key);

        let mut day_counts = HashMap::new();
        for key in kv.list_keys() {
            let Some(day) = key.strip_prefix(SCHEDULED_PREFIX) else {
                continue;
            };
            let entries: Vec<ScheduledTask> = decode(kv.get(&key), &key);
            if !entries.is_empty() {
                day_counts.insert(day.to_string(), entries.len());
            }
        }

        tracing::info!(
            tasks = tasks.len(),
            recurring = recurring.len(),
            day = %date_key(today),
            "schedule store loaded"
        );

        Self {
            kv,
            tasks,
            recurring,
            display_date: today,
            day_tasks,
            day_counts,
        }
    }

    pub fn display_date(&self) -> NaiveDate {
        self.display_date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn recurring(&self) -> &[RecurringAppointment] {
        &self.recurring
    }

    /// Persisted single-day entries for the displayed day.
    pub fn day_tasks(&self) -> &[ScheduledTask] {
        &self.day_tasks
    }

    /// Effective, collision-resolved schedule for the displayed day.
    pub fn schedule(&self) -> Vec<ScheduledTask> {
        logic::materialize(self.display_date, &self.day_tasks, &self.recurring)
    }

    /// Sparse `dateKey -> entry count` map for the calendar heatmap.
    /// The displayed day reflects the in-memory list; days without
    /// entries are absent.
    pub fn day_activity_counts(&self) -> HashMap<String, usize> {
        let mut counts = self.day_counts.clone();
        let key = date_key(self.display_date);
        if self.day_tasks.is_empty() {
            counts.remove(&key);
        } else {
            counts.insert(key, self.day_tasks.len());
        }
        counts
    }

    /// Switch the displayed day: flush the outgoing day's entries and
    /// load the incoming day's persisted list.
    pub fn set_display_date(&mut self, date: NaiveDate) {
        if date == self.display_date {
            return;
        }
        self.save_day();
        let key = scheduled_key(&date_key(date));
        self.day_tasks = decode(self.kv.get(&key), &key);
        self.display_date = date;
        tracing::info!(
            day = %date_key(date),
            entries = self.day_tasks.len(),
            "displayed day changed"
        );
    }

    /// Persist everything the store owns.
    pub fn flush(&mut self) {
        self.save_tasks();
        self.save_recurring();
        self.save_day();
    }

    /// AddTask: templates are not placements, so no collision check.
    pub fn add_task(&mut self, input: NewTask) -> Result<Task, ScheduleError> {
        Self::validate_task_input(&input)?;
        let kind = match input.kind {
            // A fresh one-off starts uncompleted, whatever the input claims.
            TaskKind::OneOff { deadline, .. } => TaskKind::OneOff {
                deadline,
                is_completed: false,
            },
            recurring => recurring,
        };
        let task = Task {
            id: Uuid::new_v4(),
            name: input.name,
            category: input.category,
            color: input.category.color().to_string(),
            duration: input.duration,
            kind,
        };
        self.tasks.push(task.clone());
        self.save_tasks();
        Ok(task)
    }

    /// UpdateTask: edits the template in place and cascades the new
    /// snapshot into the displayed day's placements. Other days keep
    /// their historical snapshots (see DESIGN.md).
    pub fn update_task(&mut self, id: Uuid, input: NewTask) -> Result<Task, ScheduleError> {
        Self::validate_task_input(&input)?;
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(ScheduleError::UnknownTask(id));
        };

        // A one-off keeps its completion state across edits.
        let kind = match (input.kind, &task.kind) {
            (TaskKind::OneOff { deadline, .. }, TaskKind::OneOff { is_completed, .. }) => {
                TaskKind::OneOff {
                    deadline,
                    is_completed: *is_completed,
                }
            }
            (TaskKind::OneOff { deadline, .. }, _) => TaskKind::OneOff {
                deadline,
                is_completed: false,
            },
            (kind, _) => kind,
        };

        task.name = input.name;
        task.category = input.category;
        task.color = input.category.color().to_string();
        task.duration = input.duration;
        task.kind = kind;
        let updated = task.clone();

        let snapshot = updated.snapshot();
        let mut cascaded = false;
        for st in self.day_tasks.iter_mut().filter(|st| st.task.id == id) {
            st.task = snapshot.clone();
            cascaded = true;
        }

        self.save_tasks();
        if cascaded {
            self.save_day();
        }
        Ok(updated)
    }

    /// DeleteTask: removes the template and every displayed-day
    /// placement referencing it. Placements persisted for other days
    /// are left in storage untouched.
    pub fn delete_task(&mut self, id: Uuid) -> Result<(), ScheduleError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(ScheduleError::UnknownTask(id));
        }

        let day_before = self.day_tasks.len();
        self.day_tasks.retain(|st| st.task.id != id);

        self.save_tasks();
        if self.day_tasks.len() != day_before {
            self.save_day();
        }
        Ok(())
    }

    /// ToggleComplete: one-off tasks only; placement and persistence of
    /// the schedule are unaffected.
    pub fn toggle_complete(&mut self, id: Uuid) -> Result<Task, ScheduleError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(ScheduleError::UnknownTask(id));
        };
        match &mut task.kind {
            TaskKind::OneOff { is_completed, .. } => *is_completed = !*is_completed,
            TaskKind::Recurring { .. } => return Err(ScheduleError::NotOneOff(id)),
        }
        let updated = task.clone();
        self.save_tasks();
        Ok(updated)
    }

    /// Place a task template on the displayed day's timeline.
    pub fn schedule_task(
        &mut self,
        task_id: Uuid,
        start_hour: f64,
    ) -> Result<ScheduledTask, ScheduleError> {
        let Some(task) = self.tasks.iter().find(|t| t.id == task_id) else {
            return Err(ScheduleError::UnknownTask(task_id));
        };
        let end = start_hour + task.duration;
        let snapshot = task.snapshot();
        logic::check_placement(start_hour, end, &self.day_tasks)?;

        let entry = ScheduledTask {
            id: Uuid::new_v4(),
            task: snapshot,
            start_hour,
        };
        self.insert_day_entry(entry.clone());
        Ok(entry)
    }

    /// AddAppointment: a single placement on the displayed day, or a
    /// weekly recurring appointment. A recurring appointment is hard-
    /// rejected only against its weekday's other recurring appointments;
    /// a clash with today's one-off entries merely suppresses today's
    /// occurrence and is reported back as a warning.
    pub fn add_appointment(
        &mut self,
        input: NewAppointment,
    ) -> Result<AppointmentOutcome, ScheduleError> {
        if input.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        let duration = input.end_hour - input.start_hour;

        match input.repeat {
            None => {
                logic::check_placement(input.start_hour, input.end_hour, &self.day_tasks)?;
                let id = Uuid::new_v4();
                let entry = ScheduledTask {
                    id,
                    task: TaskSnapshot {
                        id,
                        name: input.name,
                        category: input.category,
                        color: input.category.color().to_string(),
                        duration,
                    },
                    start_hour: input.start_hour,
                };
                self.insert_day_entry(entry.clone());
                Ok(AppointmentOutcome::Scheduled { entry })
            }
            Some(day_of_week) => {
                if day_of_week > 6 {
                    return Err(ScheduleError::InvalidWeekday(day_of_week));
                }
                logic::check_recurring_slot(
                    input.start_hour,
                    input.end_hour,
                    day_of_week,
                    &self.recurring,
                )?;

                let appointment = RecurringAppointment {
                    id: Uuid::new_v4(),
                    name: input.name,
                    category: input.category,
                    color: input.category.color().to_string(),
                    duration,
                    start_hour: input.start_hour,
                    day_of_week,
                };

                // Warning-only check: creation still succeeds, but today's
                // occurrence will be suppressed by the materializer.
                let suppressed_today = weekday_index(self.display_date) == day_of_week
                    && logic::find_collision(input.start_hour, input.end_hour, &self.day_tasks)
                        .is_some();
                if suppressed_today {
                    tracing::warn!(
                        appointment = %appointment.name,
                        day = %date_key(self.display_date),
                        "occurrence hidden on the displayed day by an existing entry"
                    );
                }

                self.recurring.push(appointment.clone());
                self.save_recurring();
                Ok(AppointmentOutcome::Recurring {
                    appointment,
                    suppressed_today,
                })
            }
        }
    }

    /// First step of the destructive delete flow: what does this id
    /// resolve to? A recurring master should be confirmed with
    /// "delete from all days?" before anything is removed. Read-only.
    pub fn request_delete(&self, id: Uuid) -> Option<DeleteKind> {
        if self.recurring.iter().any(|ra| ra.id == id) {
            return Some(DeleteKind::RecurringMaster);
        }
        if self.day_tasks.iter().any(|st| st.id == id) {
            return Some(DeleteKind::SingleInstance);
        }
        None
    }

    /// Second step: actually remove. A recurring master disappears from
    /// every day at once; a single instance only from the displayed day.
    pub fn confirm_delete(&mut self, id: Uuid) -> Result<DeleteKind, ScheduleError> {
        if self.recurring.iter().any(|ra| ra.id == id) {
            self.recurring.retain(|ra| ra.id != id);
            self.save_recurring();
            tracing::info!(%id, "recurring appointment deleted from all days");
            return Ok(DeleteKind::RecurringMaster);
        }
        let before = self.day_tasks.len();
        self.day_tasks.retain(|st| st.id != id);
        if self.day_tasks.len() == before {
            return Err(ScheduleError::UnknownEntry(id));
        }
        self.save_day();
        Ok(DeleteKind::SingleInstance)
    }

    fn validate_task_input(input: &NewTask) -> Result<(), ScheduleError> {
        if input.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        if input.duration <= 0.0 {
            return Err(ScheduleError::NonPositiveDuration);
        }
        if let TaskKind::Recurring { day, time } = &input.kind {
            if *day > 6 {
                return Err(ScheduleError::InvalidWeekday(*day));
            }
            if parse_hhmm(time).is_none() {
                return Err(ScheduleError::InvalidTime(time.clone()));
            }
        }
        Ok(())
    }

    fn insert_day_entry(&mut self, entry: ScheduledTask) {
        self.day_tasks.push(entry);
        self.day_tasks
            .sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));
        self.save_day();
    }

    fn save_tasks(&mut self) {
        write_record(&mut *self.kv, TASKS_KEY, &self.tasks);
    }

    fn save_recurring(&mut self) {
        write_record(&mut *self.kv, RECURRING_KEY, &self.recurring);
    }

    /// Flush the displayed day. The key is deleted when the day emptied
    /// out, keeping the per-day key set a sparse activity index.
    fn save_day(&mut self) {
        let day = date_key(self.display_date);
        let key = scheduled_key(&day);
        if self.day_tasks.is_empty() {
            if let Err(err) = self.kv.delete(&key) {
                tracing::error!(%key, %err, "failed to delete day record");
            }
            self.day_counts.remove(&day);
        } else {
            write_record(&mut *self.kv, &key, &self.day_tasks);
            self.day_counts.insert(day, self.day_tasks.len());
        }
    }
}

fn decode<T: serde::de::DeserializeOwned + Default>(bytes: Option<Vec<u8>>, key: &str) -> T {
    let Some(bytes) = bytes else {
        return T::default();
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, %err, "malformed record, falling back to empty");
            T::default()
        }
    }
}

fn write_record<T: Serialize>(kv: &mut dyn KvStore, key: &str, value: &T) {
    match serde_json::to_vec_pretty(value) {
        Ok(bytes) => {
            if let Err(err) = kv.set(key, &bytes) {
                tracing::error!(key, %err, "failed to persist record");
            }
        }
        Err(err) => tracing::error!(key, %err, "failed to serialize record"),
    }
}
