//! Story domain model.
//!
//! # Responsibility
//! - Define the canonical work-item record shown on the board.
//! - Own required-field validation for new stories.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused after deletion.
//! - `status` is always one of the three `StoryStatus` values.
//! - `time_allotted` is at least one hour.
//! - `end_date` is NOT required to be on or after `start_date`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned story identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub i64);

impl StoryId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for StoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Board lifecycle label.
///
/// Any status may be set from any other status; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoryStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl StoryStatus {
    /// All statuses in board column order.
    pub const ALL: [StoryStatus; 3] = [Self::ToDo, Self::InProgress, Self::Completed];

    /// Literal persisted in `stories.status` and shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Strict parse of the persisted literal.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == value)
    }
}

impl Display for StoryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when user input names no known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown status `{}`; expected one of: To Do, In Progress, Completed",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for StoryStatus {
    type Err = ParseStatusError;

    /// Lenient parse for user input (labels, snake/kebab case, `done`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "todo" => Ok(Self::ToDo),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_string())),
        }
    }
}

/// Validation failure for a story draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryValidationError {
    EmptyTitle,
    EmptyAssignee,
    InvalidTimeAllotted(u32),
}

impl Display for StoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyAssignee => write!(f, "assignee is required"),
            Self::InvalidTimeAllotted(hours) => {
                write!(f, "time_allotted must be at least 1 hour, got {hours}")
            }
        }
    }
}

impl Error for StoryValidationError {}

/// Draft for a story that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub assignee: String,
    /// Hours, at least one.
    pub time_allotted: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: StoryStatus,
}

impl NewStory {
    /// Builds a draft from caller input as given. Does not validate.
    pub fn new(
        title: impl Into<String>,
        assignee: impl Into<String>,
        time_allotted: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: StoryStatus,
    ) -> Self {
        Self {
            title: title.into(),
            assignee: assignee.into(),
            time_allotted,
            start_date,
            end_date,
            status,
        }
    }

    /// Checks required fields.
    ///
    /// The date range is deliberately left unchecked.
    pub fn validate(&self) -> Result<(), StoryValidationError> {
        if self.title.is_empty() {
            return Err(StoryValidationError::EmptyTitle);
        }
        if self.assignee.is_empty() {
            return Err(StoryValidationError::EmptyAssignee);
        }
        if self.time_allotted < 1 {
            return Err(StoryValidationError::InvalidTimeAllotted(self.time_allotted));
        }
        Ok(())
    }
}

/// Persisted story as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub assignee: String,
    pub time_allotted: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: StoryStatus,
}

impl Story {
    /// Whether `day` lies inside `[start_date, end_date]`.
    ///
    /// A reversed range contains no day.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Returns the draft fields of this story.
    pub fn to_draft(&self) -> NewStory {
        NewStory {
            title: self.title.clone(),
            assignee: self.assignee.clone(),
            time_allotted: self.time_allotted,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
        }
    }
}
