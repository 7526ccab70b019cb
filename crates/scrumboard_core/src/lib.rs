//! Core domain logic for the scrum board.
//! This crate is the single source of truth for story invariants.

pub mod config;
pub mod db;
pub mod grid;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod trends;

pub use config::{BoardConfig, ConfigError, ConfigOverrides};
pub use db::{ensure_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use grid::{render_table, GridRow, StoryFilter};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogSink, LoggingError,
};
pub use model::story::{
    NewStory, ParseStatusError, Story, StoryId, StoryStatus, StoryValidationError,
};
pub use repo::story_repo::{
    DeleteOutcome, RepoError, RepoResult, SqliteStoryRepository, StoryRepository, UpdateOutcome,
};
pub use service::story_service::{BoardChange, ServiceError, StoryService};
pub use trends::{build_trends, AssigneeHours, StatusCount, TimelineEntry, TrendReport, Trends};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
