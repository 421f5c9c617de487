use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed set of activity categories. Display color and border come from
/// a static lookup so the presentation layer never hardcodes the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Study,
    Work,
    Hobby,
    Break,
    Exercise,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Study,
        Category::Work,
        Category::Hobby,
        Category::Break,
        Category::Exercise,
        Category::Other,
    ];

    pub fn color(self) -> &'static str {
        match self {
            Category::Study => "#3b82f6",
            Category::Work => "#22c55e",
            Category::Hobby => "#eab308",
            Category::Break => "#ec4899",
            Category::Exercise => "#8b5cf6",
            Category::Other => "#6b7280",
        }
    }

    pub fn border(self) -> &'static str {
        match self {
            Category::Study => "#1d4ed8",
            Category::Work => "#15803d",
            Category::Hobby => "#a16207",
            Category::Break => "#be185d",
            Category::Exercise => "#6d28d9",
            Category::Other => "#374151",
        }
    }
}

/// What kind of template a task is. One-off tasks carry an optional
/// deadline and a completion flag; recurring tasks carry the weekday
/// (0 = Sunday) and wall-clock time they repeat at. The enum makes
/// "exactly one field set populated" unrepresentable rather than checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task_type", rename_all = "snake_case")]
pub enum TaskKind {
    OneOff {
        #[serde(default)]
        deadline: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        is_completed: bool,
    },
    Recurring {
        day: u8,      // 0..=6, Sunday = 0
        time: String, // "HH:MM"
    },
}

/// A reusable activity template. Templates are never placed on the
/// timeline directly; placements embed a snapshot of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub color: String, // derived from category, kept in sync on edit
    pub duration: f64, // hours, fractional allowed
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            color: self.color.clone(),
            duration: self.duration,
        }
    }
}

/// A standalone weekly-recurring occupied interval, independent of the
/// task list. Deleted whole; there is no per-occurrence deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringAppointment {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub color: String,
    pub duration: f64,   // hours
    pub start_hour: f64, // 0..=24, start_hour + duration <= 24
    pub day_of_week: u8, // 0..=6, Sunday = 0
}

impl RecurringAppointment {
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration
    }

    /// Concrete occurrence for one day. The occurrence keeps the
    /// appointment id so a click on it resolves back to the recurring
    /// master for deletion.
    pub fn occurrence(&self) -> ScheduledTask {
        ScheduledTask {
            id: self.id,
            task: TaskSnapshot {
                id: self.id,
                name: self.name.clone(),
                category: self.category,
                color: self.color.clone(),
                duration: self.duration,
            },
            start_hour: self.start_hour,
        }
    }
}

/// Copy of the template fields a placement needs. A copy, not a live
/// reference: edits to the template reach already-placed instances only
/// when the mutation API explicitly cascades them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub color: String,
    pub duration: f64,
}

/// One concrete placement on a specific day's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: Uuid,
    pub task: TaskSnapshot,
    pub start_hour: f64,
}

impl ScheduledTask {
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.task.duration
    }
}
