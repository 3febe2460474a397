//! Scheduling request and response types.
//!
//! These are plain data handed over by whatever layer loads tasks, goals
//! and the user profile. The scheduler reads them and never mutates them.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

/// A task as stored by the surrounding application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    /// Tasks with an empty title are ignored by the scheduler.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Mission alignment score, usually 0-100.
    #[serde(default)]
    pub alignment_score: Option<i64>,
    /// Raw category label; see [`AlignmentCategory::normalize`].
    #[serde(default)]
    pub alignment_category: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub goal_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    pub fn category(&self) -> AlignmentCategory {
        AlignmentCategory::normalize(self.alignment_category.as_deref())
    }
}

/// A measurable goal that tasks can be linked to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub current_value: Option<i64>,
    #[serde(default)]
    pub target_value: Option<i64>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Preferred working rhythm reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    Morning,
    Evening,
    Neutral,
}

impl Chronotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chronotype::Morning => "morning",
            Chronotype::Evening => "evening",
            Chronotype::Neutral => "neutral",
        }
    }
}

/// Who the suggestions are for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub focus_areas: Option<String>,
    #[serde(default)]
    pub chronotype: Option<Chronotype>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Mission alignment bucket of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentCategory {
    High,
    Medium,
    Low,
    Distraction,
}

impl AlignmentCategory {
    /// Case-insensitive parse; anything unrecognized (or missing) is `Medium`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().to_lowercase().as_str() {
            "high" => AlignmentCategory::High,
            "low" => AlignmentCategory::Low,
            "distraction" => AlignmentCategory::Distraction,
            _ => AlignmentCategory::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentCategory::High => "high",
            AlignmentCategory::Medium => "medium",
            AlignmentCategory::Low => "low",
            AlignmentCategory::Distraction => "distraction",
        }
    }
}

/// One scheduling request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerInput {
    pub user: UserContext,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Local wall-clock time of the request. Defaults to now.
    #[serde(default, with = "wall_clock")]
    pub now: Option<NaiveDateTime>,
}

impl SchedulerInput {
    pub fn new(user: UserContext) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Injected clock, or the current local time.
    pub fn clock(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the user id is empty.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let input: SchedulerInput = serde_json::from_str(json)?;
        if input.user.user_id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "user.userId".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(input)
    }
}

/// Parse a wall-clock timestamp.
///
/// Accepts RFC 3339, converted to this host's local time, or a naive
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` taken as local time already.
pub fn parse_wall_clock(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "now".to_string(),
            message: format!("cannot parse '{value}' as a timestamp"),
        })
}

mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_wall_clock(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// A ranked task with the score breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSuggestion {
    pub task_id: i64,
    pub score: i64,
    pub tags: Vec<String>,
    /// Contributions joined with ", ", e.g. `alignment, +10 morning-focus`.
    pub reason: String,
}

impl ScheduledSuggestion {
    /// Attach the task title for display, falling back to `Task <id>`.
    pub fn with_title(self, tasks: &[Task]) -> TitledSuggestion {
        let title = tasks
            .iter()
            .find(|t| t.id == self.task_id && !t.title.is_empty())
            .map(|t| t.title.clone())
            .unwrap_or_else(|| format!("Task {}", self.task_id));
        TitledSuggestion {
            suggestion: self,
            title,
        }
    }
}

/// Suggestion plus the task title, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledSuggestion {
    #[serde(flatten)]
    pub suggestion: ScheduledSuggestion,
    pub title: String,
}
