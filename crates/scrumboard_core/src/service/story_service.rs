//! Story use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/delete entry points the dashboard calls.
//! - Convert repository failures into the caller-facing error taxonomy.
//! - Report writes as `BoardChange` values so callers know when to re-render.
//!
//! # Invariants
//! - Validation runs before any repository call.
//! - No repository error escapes unconverted; every failure is logged.
//! - A missing target id is a warning outcome, never an error.
//! - Logs carry ids and statuses only, never user-entered text.

use crate::db::DbError;
use crate::grid::StoryFilter;
use crate::model::story::{NewStory, Story, StoryId, StoryStatus, StoryValidationError};
use crate::repo::story_repo::{DeleteOutcome, RepoError, StoryRepository, UpdateOutcome};
use crate::trends::{build_trends, Trends};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-facing failure of a board operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field missing or invalid; storage was not touched.
    Validation(StoryValidationError),
    /// The store rejected or failed the statement.
    Storage(DbError),
    /// Anything else.
    Unexpected(String),
}

impl ServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Storage(_) => "storage_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "please fill in all required fields: {err}"),
            Self::Storage(err) => write!(f, "database error: {err}"),
            Self::Unexpected(message) => write!(f, "an unexpected error occurred: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Unexpected(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Storage(err) => Self::Storage(err),
            RepoError::Unexpected(message) => Self::Unexpected(message),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

/// State change produced by a write, consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardChange {
    Created(StoryId),
    StatusUpdated(StoryId),
    Deleted(StoryId),
    /// The target id matched no row; nothing changed.
    NotFound(StoryId),
}

impl BoardChange {
    /// Whether views built from earlier reads are now stale.
    pub fn needs_refresh(self) -> bool {
        !matches!(self, Self::NotFound(_))
    }

    pub fn story_id(self) -> StoryId {
        match self {
            Self::Created(id) | Self::StatusUpdated(id) | Self::Deleted(id) | Self::NotFound(id) => {
                id
            }
        }
    }
}

/// Use-case service wrapper over a story repository.
pub struct StoryService<R: StoryRepository> {
    repo: R,
}

impl<R: StoryRepository> StoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a story after checking required fields.
    ///
    /// Identical drafts submitted twice become two independent stories.
    pub fn create_story(&self, draft: &NewStory) -> Result<BoardChange, ServiceError> {
        if let Err(err) = draft.validate() {
            let err = ServiceError::Validation(err);
            log_failure("story_create", None, &err);
            return Err(err);
        }

        match self.repo.create_story(draft) {
            Ok(id) => {
                info!(
                    "event=story_create module=service status=ok story_id={} story_status={}",
                    id,
                    draft.status.label()
                );
                Ok(BoardChange::Created(id))
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("story_create", None, &err);
                Err(err)
            }
        }
    }

    /// Reads every story, fresh from storage.
    pub fn list_stories(&self) -> Result<Vec<Story>, ServiceError> {
        self.repo.list_stories().map_err(|err| {
            let err = ServiceError::from(err);
            log_failure("story_list", None, &err);
            err
        })
    }

    /// Reads every story and keeps those matching `filter`, in read order.
    pub fn list_filtered(&self, filter: &StoryFilter) -> Result<Vec<Story>, ServiceError> {
        Ok(filter.apply(self.list_stories()?))
    }

    /// Changes only the status of one story.
    pub fn update_status(
        &self,
        id: StoryId,
        status: StoryStatus,
    ) -> Result<BoardChange, ServiceError> {
        match self.repo.update_status(id, status) {
            Ok(UpdateOutcome::Updated) => {
                info!(
                    "event=story_update_status module=service status=ok story_id={} story_status={}",
                    id,
                    status.label()
                );
                Ok(BoardChange::StatusUpdated(id))
            }
            Ok(UpdateOutcome::NotFound) => {
                warn!("event=story_update_status module=service status=not_found story_id={id}");
                Ok(BoardChange::NotFound(id))
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("story_update_status", Some(id), &err);
                Err(err)
            }
        }
    }

    /// Permanently deletes one story.
    pub fn delete_story(&self, id: StoryId) -> Result<BoardChange, ServiceError> {
        match self.repo.delete_story(id) {
            Ok(DeleteOutcome::Deleted) => {
                info!("event=story_delete module=service status=ok story_id={id}");
                Ok(BoardChange::Deleted(id))
            }
            Ok(DeleteOutcome::NotFound) => {
                warn!("event=story_delete module=service status=not_found story_id={id}");
                Ok(BoardChange::NotFound(id))
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("story_delete", Some(id), &err);
                Err(err)
            }
        }
    }

    /// Aggregates trend series over a fresh read of all stories.
    pub fn trends(&self) -> Result<Trends, ServiceError> {
        Ok(build_trends(&self.list_stories()?))
    }
}

fn log_failure(event: &str, id: Option<StoryId>, err: &ServiceError) {
    let story_id = id.map_or_else(|| "-".to_string(), |value| value.to_string());
    match err {
        ServiceError::Validation(_) => warn!(
            "event={} module=service status=rejected story_id={} error_code={} error={}",
            event,
            story_id,
            err.code(),
            err
        ),
        _ => error!(
            "event={} module=service status=error story_id={} error_code={} error={}",
            event,
            story_id,
            err.code(),
            err
        ),
    }
}
