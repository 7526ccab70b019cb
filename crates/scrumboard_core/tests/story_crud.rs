use chrono::NaiveDate;
use rusqlite::Connection;
use scrumboard_core::db::migrations::latest_version;
use scrumboard_core::{
    open_db_in_memory, DeleteOutcome, NewStory, RepoError, SqliteStoryRepository, Story, StoryId,
    StoryRepository, StoryStatus, StoryValidationError, UpdateOutcome,
};
use std::collections::HashSet;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn draft(title: &str, assignee: &str, hours: u32, status: StoryStatus) -> NewStory {
    NewStory::new(title, assignee, hours, date(2, 1), date(2, 14), status)
}

fn find(stories: &[Story], id: StoryId) -> Option<&Story> {
    stories.iter().find(|story| story.id == id)
}

#[test]
fn create_then_list_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let before = repo.list_stories().unwrap();
    assert!(before.is_empty());

    let new_story = draft("Login page", "Ana", 5, StoryStatus::InProgress);
    let id = repo.create_story(&new_story).unwrap();

    let after = repo.list_stories().unwrap();
    assert_eq!(after.len(), 1);
    let loaded = find(&after, id).unwrap();
    assert_eq!(loaded.to_draft(), new_story);
}

#[test]
fn create_stores_text_fields_exactly_as_submitted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let padded = draft(" Login ", "  Ana\t", 2, StoryStatus::ToDo);
    let id = repo.create_story(&padded).unwrap();

    let stories = repo.list_stories().unwrap();
    let loaded = find(&stories, id).unwrap();
    assert_eq!(loaded.title, " Login ");
    assert_eq!(loaded.assignee, "  Ana\t");
    assert_eq!(loaded.to_draft(), padded);
}

#[test]
fn ids_are_unique_and_never_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let first = repo.create_story(&draft("a", "x", 1, StoryStatus::ToDo)).unwrap();
    let second = repo.create_story(&draft("b", "x", 1, StoryStatus::ToDo)).unwrap();
    assert_ne!(first, second);

    assert_eq!(repo.delete_story(second).unwrap(), DeleteOutcome::Deleted);
    let third = repo.create_story(&draft("c", "x", 1, StoryStatus::ToDo)).unwrap();

    let seen: HashSet<StoryId> = [first, second, third].into_iter().collect();
    assert_eq!(seen.len(), 3);
}

#[test]
fn duplicate_drafts_create_independent_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let same = draft("Same", "Ana", 2, StoryStatus::ToDo);
    let first = repo.create_story(&same).unwrap();
    let second = repo.create_story(&same).unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.list_stories().unwrap().len(), 2);
}

#[test]
fn reversed_date_range_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let reversed = NewStory::new("Backwards", "Ana", 1, date(3, 9), date(3, 2), StoryStatus::ToDo);
    let id = repo.create_story(&reversed).unwrap();

    let stories = repo.list_stories().unwrap();
    let loaded = find(&stories, id).unwrap();
    assert_eq!(loaded.start_date, date(3, 9));
    assert_eq!(loaded.end_date, date(3, 2));
}

#[test]
fn update_status_changes_only_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let id = repo
        .create_story(&draft("Search", "Ben", 8, StoryStatus::ToDo))
        .unwrap();
    let before = find(&repo.list_stories().unwrap(), id).unwrap().clone();

    let outcome = repo.update_status(id, StoryStatus::Completed).unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let after = find(&repo.list_stories().unwrap(), id).unwrap().clone();
    assert_eq!(after.status, StoryStatus::Completed);
    assert_eq!(
        Story {
            status: before.status,
            ..after
        },
        before
    );
}

#[test]
fn any_status_transition_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();
    let id = repo
        .create_story(&draft("Loop", "Ben", 1, StoryStatus::Completed))
        .unwrap();

    for status in [
        StoryStatus::ToDo,
        StoryStatus::Completed,
        StoryStatus::InProgress,
        StoryStatus::ToDo,
    ] {
        assert_eq!(repo.update_status(id, status).unwrap(), UpdateOutcome::Updated);
        assert_eq!(find(&repo.list_stories().unwrap(), id).unwrap().status, status);
    }
}

#[test]
fn update_status_on_missing_id_leaves_table_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();
    repo.create_story(&draft("Keep", "Ana", 3, StoryStatus::ToDo))
        .unwrap();
    let before = repo.list_stories().unwrap();

    let outcome = repo
        .update_status(StoryId(9_999), StoryStatus::Completed)
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NotFound);
    assert_eq!(repo.list_stories().unwrap(), before);
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();
    let keep = repo.create_story(&draft("Keep", "Ana", 1, StoryStatus::ToDo)).unwrap();
    let removed = repo.create_story(&draft("Drop", "Ana", 1, StoryStatus::ToDo)).unwrap();

    assert_eq!(repo.delete_story(removed).unwrap(), DeleteOutcome::Deleted);

    let remaining = repo.list_stories().unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(find(&remaining, removed).is_none());
    assert!(find(&remaining, keep).is_some());
}

#[test]
fn delete_on_missing_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();
    let id = repo.create_story(&draft("Once", "Ana", 1, StoryStatus::ToDo)).unwrap();
    repo.delete_story(id).unwrap();
    let before = repo.list_stories().unwrap();

    assert_eq!(repo.delete_story(id).unwrap(), DeleteOutcome::NotFound);
    assert_eq!(repo.list_stories().unwrap(), before);
}

#[test]
fn list_reads_through_writes_from_other_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");
    let reader_conn = scrumboard_core::open_db(&path).unwrap();
    let writer_conn = scrumboard_core::open_db(&path).unwrap();
    let reader = SqliteStoryRepository::try_new(&reader_conn).unwrap();
    let writer = SqliteStoryRepository::try_new(&writer_conn).unwrap();

    assert!(reader.list_stories().unwrap().is_empty());
    let id = writer
        .create_story(&draft("Fresh", "Ana", 1, StoryStatus::ToDo))
        .unwrap();
    assert_eq!(reader.list_stories().unwrap().len(), 1);

    writer.delete_story(id).unwrap();
    assert!(reader.list_stories().unwrap().is_empty());
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let err = repo
        .create_story(&draft("", "Ana", 1, StoryStatus::ToDo))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(StoryValidationError::EmptyTitle)));

    let err = repo
        .create_story(&draft("Title", "", 1, StoryStatus::ToDo))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(StoryValidationError::EmptyAssignee)));

    assert!(repo.list_stories().unwrap().is_empty());
}

#[test]
fn store_rejects_status_outside_enumeration() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO stories (title, assignee, time_allotted, start_date, end_date, status)
         VALUES ('t', 'a', 1, '2024-01-01', '2024-01-02', 'Blocked');",
        [],
    );

    assert!(result.is_err());
}

#[test]
fn invalid_persisted_row_is_reported_as_unexpected() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO stories (title, assignee, time_allotted, start_date, end_date, status)
         VALUES ('t', 'a', 1, 'someday', '2024-01-02', 'To Do');",
        [],
    )
    .unwrap();
    let repo = SqliteStoryRepository::try_new(&conn).unwrap();

    let err = repo.list_stories().unwrap_err();
    assert!(matches!(err, RepoError::Unexpected(message) if message.contains("start_date")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStoryRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_stories_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteStoryRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("stories"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE stories (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            assignee TEXT NOT NULL,
            time_allotted INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteStoryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "stories",
            column: "status"
        })
    ));
}
