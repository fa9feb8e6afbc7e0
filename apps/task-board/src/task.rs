//! Task records as stored on disk.

use serde::{Deserialize, Serialize};

/// Progress of a task. Stored as `0`, `1` or `2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    #[default]
    InProgress,
    Done,
    Failed,
}

impl TaskStatus {
    /// Style class applied to rendered rows. In-progress rows carry none.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            TaskStatus::InProgress => None,
            TaskStatus::Done => Some("done"),
            TaskStatus::Failed => Some("fail"),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::InProgress),
            1 => Ok(TaskStatus::Done),
            2 => Ok(TaskStatus::Failed),
            other => Err(format!("unknown task status {other}")),
        }
    }
}

/// A single task. Timestamps are milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: u64,
    #[serde(default)]
    pub deadline: u64,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Creates an in-progress task stamped with `now_ms`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: u64,
        now_ms: u64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            date: now_ms,
            deadline,
            status: TaskStatus::InProgress,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Value of a template placeholder. Dates are formatted for display;
    /// unknown names have no value.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "description" => Some(self.description.clone()),
            "date" => Some(format_timestamp(self.date)),
            "deadline" if self.deadline > 0 => Some(format_timestamp(self.deadline)),
            "status" => Some(u8::from(self.status).to_string()),
            _ => None,
        }
    }
}

pub const DAY_MS: u64 = 86_400_000;

/// Generates `count` demo tasks. Creation dates step back a minute per task
/// and stop at the epoch; deadlines cycle over the next 30 days.
pub fn seed_tasks(count: u64, now_ms: u64) -> Vec<Task> {
    (0..count)
        .map(|i| {
            Task::new(
                format!("Task {i}"),
                format!("Generated task number {i}"),
                now_ms.saturating_add((i % 30) * DAY_MS),
                now_ms.saturating_sub(i * 60_000),
            )
        })
        .collect()
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(epoch_ms: u64) -> String {
    let secs = epoch_ms / 1000;
    let days = (secs / 86_400) as i64;
    let minutes_of_day = (secs % 86_400) / 60;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}",
        minutes_of_day / 60,
        minutes_of_day % 60
    )
}

// Howard Hinnant's days-to-civil conversion.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
