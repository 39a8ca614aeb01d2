//! Habit execution domain entity, status enumeration and streak rule.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_DONE: &str = "done";
pub const STATUS_NOT_DONE: &str = "not_done";
pub const STATUS_SKIPPED: &str = "skipped";

/// Outcome of a habit on a given day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Done,
    NotDone,
    Skipped,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => STATUS_PENDING,
            ExecutionStatus::Done => STATUS_DONE,
            ExecutionStatus::NotDone => STATUS_NOT_DONE,
            ExecutionStatus::Skipped => STATUS_SKIPPED,
        }
    }
}

/// Unknown values read back from storage degrade to `Pending`.
impl From<&str> for ExecutionStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_DONE => ExecutionStatus::Done,
            STATUS_NOT_DONE => ExecutionStatus::NotDone,
            STATUS_SKIPPED => ExecutionStatus::Skipped,
            _ => ExecutionStatus::Pending,
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-day record of a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitExecution {
    pub id: i32,
    pub habit_id: i32,
    pub execution_date: NaiveDate,
    pub status: ExecutionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for recording today's status
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateExecution {
    #[schema(example = "done")]
    pub status: ExecutionStatus,
}

/// Row to insert, with the habit and date resolved by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewExecution {
    pub habit_id: i32,
    pub execution_date: NaiveDate,
    pub status: ExecutionStatus,
}

/// Status change for an existing execution
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateExecution {
    #[schema(example = "skipped")]
    pub status: ExecutionStatus,
}

/// Optional filters for listing executions; date bounds are inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ExecutionFilter {
    pub status: Option<ExecutionStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub habit_id: i32,
    #[schema(value_type = String, example = "2024-05-01")]
    pub execution_date: NaiveDate,
    pub status: ExecutionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HabitExecution> for ExecutionResponse {
    fn from(e: HabitExecution) -> Self {
        Self {
            id: e.id,
            habit_id: e.habit_id,
            execution_date: e.execution_date,
            status: e.status,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Length of the running streak.
///
/// Walks from the newest date backwards. Leading `pending` days are ignored,
/// `done` days count, `skipped` days keep the chain without counting, and a
/// `not_done` or `pending` day or a gap in the calendar ends it.
pub fn current_streak(executions: &[HabitExecution]) -> i32 {
    let mut days: Vec<(NaiveDate, ExecutionStatus)> = executions
        .iter()
        .map(|e| (e.execution_date, e.status))
        .collect();
    days.sort_by(|a, b| b.0.cmp(&a.0));

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for (date, status) in days {
        match expected {
            None if status == ExecutionStatus::Pending => continue,
            Some(day) if day != date => break,
            _ => {}
        }

        match status {
            ExecutionStatus::Done => streak += 1,
            ExecutionStatus::Skipped => {}
            ExecutionStatus::NotDone | ExecutionStatus::Pending => break,
        }

        match date.pred_opt() {
            Some(prev) => expected = Some(prev),
            None => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(day: u32, status: ExecutionStatus) -> HabitExecution {
        HabitExecution {
            id: day as i32,
            habit_id: 1,
            execution_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    use super::ExecutionStatus::*;

    #[test]
    fn test_status_string_mapping() {
        assert_eq!(ExecutionStatus::from("not_done"), NotDone);
        assert_eq!(ExecutionStatus::from("garbage"), Pending);
        assert_eq!(String::from(Skipped), "skipped");
        assert_eq!(serde_json::to_string(&NotDone).unwrap(), "\"not_done\"");
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn test_streak_consecutive_done() {
        let rows = vec![exec(3, Done), exec(1, Done), exec(2, Done)];
        assert_eq!(current_streak(&rows), 3);
    }

    #[test]
    fn test_streak_ignores_leading_pending() {
        let rows = vec![exec(4, Pending), exec(3, Done), exec(2, Done)];
        assert_eq!(current_streak(&rows), 2);
    }

    #[test]
    fn test_streak_skipped_keeps_chain() {
        let rows = vec![exec(4, Done), exec(3, Skipped), exec(2, Done), exec(1, NotDone)];
        assert_eq!(current_streak(&rows), 2);
    }

    #[test]
    fn test_streak_breaks_on_gap() {
        let rows = vec![exec(5, Done), exec(4, Done), exec(2, Done)];
        assert_eq!(current_streak(&rows), 2);
    }

    #[test]
    fn test_streak_breaks_on_not_done() {
        let rows = vec![exec(5, NotDone), exec(4, Done)];
        assert_eq!(current_streak(&rows), 0);
    }
}
