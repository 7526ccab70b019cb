//! Story repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/update-status/delete over the `stories` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every write is a single parameterized statement, so SQLite's autocommit
//!   gives it statement-level atomicity.
//! - Write paths call `NewStory::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list_stories` never caches and never orders.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::story::{NewStory, Story, StoryId, StoryStatus, StoryValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STORY_SELECT_SQL: &str = "SELECT
    id,
    title,
    assignee,
    time_allotted,
    start_date,
    end_date,
    status
FROM stories";

const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "assignee",
    "time_allotted",
    "start_date",
    "end_date",
    "status",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for story persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StoryValidationError),
    /// The store rejected or failed a statement.
    Storage(DbError),
    /// Any other failure, such as a row that violates the model.
    Unexpected(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "database error: {err}"),
            Self::Unexpected(message) => write!(f, "unexpected error: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoryValidationError> for RepoError {
    fn from(value: StoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Result of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Repository interface for story CRUD operations.
pub trait StoryRepository {
    /// Inserts one story and returns its storage-assigned id.
    fn create_story(&self, story: &NewStory) -> RepoResult<StoryId>;
    /// Reads every current row, in store-default order.
    fn list_stories(&self) -> RepoResult<Vec<Story>>;
    /// Sets `status` on one row, leaving every other column untouched.
    fn update_status(&self, id: StoryId, status: StoryStatus) -> RepoResult<UpdateOutcome>;
    /// Permanently removes one row.
    fn delete_story(&self, id: StoryId) -> RepoResult<DeleteOutcome>;
}

/// SQLite-backed story repository borrowing an initialized connection.
pub struct SqliteStoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStoryRepository<'conn> {
    /// Wraps a connection after checking that the schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `ensure_schema` has not run.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   altered behind the version stamp.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_story_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StoryRepository for SqliteStoryRepository<'_> {
    fn create_story(&self, story: &NewStory) -> RepoResult<StoryId> {
        story.validate()?;

        self.conn.execute(
            "INSERT INTO stories (
                title,
                assignee,
                time_allotted,
                start_date,
                end_date,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                story.title.as_str(),
                story.assignee.as_str(),
                story.time_allotted,
                story.start_date.format(DATE_FORMAT).to_string(),
                story.end_date.format(DATE_FORMAT).to_string(),
                story.status.label(),
            ],
        )?;

        Ok(StoryId(self.conn.last_insert_rowid()))
    }

    fn list_stories(&self) -> RepoResult<Vec<Story>> {
        let mut stmt = self.conn.prepare(&format!("{STORY_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut stories = Vec::new();

        while let Some(row) = rows.next()? {
            stories.push(parse_story_row(row)?);
        }

        Ok(stories)
    }

    fn update_status(&self, id: StoryId, status: StoryStatus) -> RepoResult<UpdateOutcome> {
        let changed = self.conn.execute(
            "UPDATE stories SET status = ?1 WHERE id = ?2;",
            params![status.label(), id.get()],
        )?;

        Ok(if changed == 0 {
            UpdateOutcome::NotFound
        } else {
            UpdateOutcome::Updated
        })
    }

    fn delete_story(&self, id: StoryId) -> RepoResult<DeleteOutcome> {
        let changed = self
            .conn
            .execute("DELETE FROM stories WHERE id = ?1;", [id.get()])?;

        Ok(if changed == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }
}

fn parse_story_row(row: &Row<'_>) -> RepoResult<Story> {
    let id: i64 = row.get("id")?;

    let hours: i64 = row.get("time_allotted")?;
    let time_allotted = u32::try_from(hours)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| {
            RepoError::Unexpected(format!(
                "invalid time_allotted `{hours}` in stories.time_allotted for id {id}"
            ))
        })?;

    let status_text: String = row.get("status")?;
    let status = StoryStatus::from_label(&status_text).ok_or_else(|| {
        RepoError::Unexpected(format!(
            "invalid status `{status_text}` in stories.status for id {id}"
        ))
    })?;

    Ok(Story {
        id: StoryId(id),
        title: row.get("title")?,
        assignee: row.get("assignee")?,
        time_allotted,
        start_date: parse_date_column(row, "start_date", id)?,
        end_date: parse_date_column(row, "end_date", id)?,
        status,
    })
}

fn parse_date_column(row: &Row<'_>, column: &str, id: i64) -> RepoResult<NaiveDate> {
    let text: String = row.get(column)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| {
        RepoError::Unexpected(format!(
            "invalid date `{text}` in stories.{column} for id {id}"
        ))
    })
}

fn ensure_story_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "stories")? {
        return Err(RepoError::MissingRequiredTable("stories"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "stories", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "stories",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
