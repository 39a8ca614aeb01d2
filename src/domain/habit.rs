//! Habit domain entity and related types.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::habit_execution::{ExecutionResponse, HabitExecution};

pub const FREQUENCY_DAILY: &str = "daily";

/// How often a habit is expected to be performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
}

impl From<&str> for HabitFrequency {
    fn from(_s: &str) -> Self {
        HabitFrequency::Daily
    }
}

impl From<HabitFrequency> for String {
    fn from(frequency: HabitFrequency) -> Self {
        frequency.to_string()
    }
}

impl std::fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HabitFrequency::Daily => f.write_str(FREQUENCY_DAILY),
        }
    }
}

/// Habit domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub target_days: i32,
    pub time_to_remind: Option<NaiveTime>,
    pub is_active: bool,
    pub current_streak: i32,
    pub max_streak: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// The habit counts as formed once the running streak reaches the target
    pub fn is_formed(&self) -> bool {
        self.current_streak >= self.target_days
    }

    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Habit together with its executions, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct HabitDetails {
    pub habit: Habit,
    pub executions: Vec<HabitExecution>,
}

/// Habit creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateHabit {
    #[schema(example = "Morning run", min_length = 1, max_length = 255)]
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
    #[schema(example = "5 km before breakfast")]
    pub description: Option<String>,
    /// Time of day for the reminder (HH:MM or HH:MM:SS)
    #[schema(value_type = String, example = "07:30")]
    #[serde(deserialize_with = "reminder_time::deserialize")]
    pub time_to_remind: NaiveTime,
    /// Days needed to form the habit; configured default when omitted
    #[schema(example = 21)]
    #[validate(range(min = 1, message = "target_days must be positive"))]
    pub target_days: Option<i32>,
}

/// Row to insert, with owner and target resolved by the service
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub time_to_remind: Option<NaiveTime>,
    pub target_days: i32,
}

impl NewHabit {
    pub fn from_request(user_id: i32, req: CreateHabit, default_target_days: i32) -> Self {
        Self {
            user_id,
            name: req.name,
            description: req.description,
            time_to_remind: Some(req.time_to_remind),
            target_days: req.target_days.unwrap_or(default_target_days),
        }
    }
}

/// Partial habit update; absent fields stay untouched.
///
/// `description: null` clears the description, an absent key leaves it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateHabit {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[schema(value_type = Option<String>, example = "21:00")]
    #[serde(default, deserialize_with = "reminder_time::deserialize_option")]
    pub time_to_remind: Option<NaiveTime>,
    #[validate(range(min = 1, message = "target_days must be positive"))]
    pub target_days: Option<i32>,
    pub is_active: Option<bool>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Accepts `HH:MM` as well as `HH:MM:SS[.f]`
mod reminder_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer};

    fn parse<E: Error>(raw: &str) -> Result<NaiveTime, E> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map_err(|_| E::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw))
            .transpose()
    }
}

/// Habit response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HabitResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "Morning run")]
    pub name: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    #[schema(example = 21)]
    pub target_days: i32,
    #[schema(value_type = Option<String>, example = "07:30:00")]
    pub time_to_remind: Option<NaiveTime>,
    pub is_active: bool,
    pub current_streak: i32,
    pub max_streak: i32,
    /// Whether the current streak reached `target_days`
    pub is_formed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        let is_formed = habit.is_formed();
        Self {
            id: habit.id,
            user_id: habit.user_id,
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency,
            target_days: habit.target_days,
            time_to_remind: habit.time_to_remind,
            is_active: habit.is_active,
            current_streak: habit.current_streak,
            max_streak: habit.max_streak,
            is_formed,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
        }
    }
}

/// Habit with its executions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HabitDetailsResponse {
    pub habit: HabitResponse,
    pub executions: Vec<ExecutionResponse>,
}

impl From<HabitDetails> for HabitDetailsResponse {
    fn from(details: HabitDetails) -> Self {
        Self {
            habit: details.habit.into(),
            executions: details.executions.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_habit_accepts_short_time() {
        let req: CreateHabit =
            serde_json::from_str(r#"{"name":"Read","time_to_remind":"08:30"}"#).unwrap();
        assert_eq!(req.time_to_remind, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert!(req.target_days.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_habit_rejects_bad_time() {
        let res = serde_json::from_str::<CreateHabit>(r#"{"name":"Read","time_to_remind":"25:99"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_create_habit_validation() {
        let req: CreateHabit = serde_json::from_str(
            r#"{"name":"","time_to_remind":"08:30:00","target_days":0}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("target_days"));
    }

    #[test]
    fn test_new_habit_applies_default_target() {
        let req: CreateHabit =
            serde_json::from_str(r#"{"name":"Read","time_to_remind":"08:30"}"#).unwrap();
        let new = NewHabit::from_request(7, req, 30);
        assert_eq!(new.user_id, 7);
        assert_eq!(new.target_days, 30);
    }

    #[test]
    fn test_update_description_null_vs_absent() {
        let absent: UpdateHabit = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateHabit = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateHabit = serde_json::from_str(r#"{"description":"d"}"#).unwrap();
        assert_eq!(set.description, Some(Some("d".to_string())));
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        let upd: UpdateHabit =
            serde_json::from_str(r#"{"current_streak":99,"is_active":false}"#).unwrap();
        assert_eq!(upd.is_active, Some(false));
    }

    #[test]
    fn test_is_formed() {
        let now = Utc::now();
        let mut habit = Habit {
            id: 1,
            user_id: 1,
            name: "Read".into(),
            description: None,
            frequency: HabitFrequency::Daily,
            target_days: 3,
            time_to_remind: None,
            is_active: true,
            current_streak: 2,
            max_streak: 2,
            created_at: now,
            updated_at: now,
        };
        assert!(!habit.is_formed());
        habit.current_streak = 3;
        assert!(habit.is_formed());
    }
}
