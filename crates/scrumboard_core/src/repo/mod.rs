//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewStory::validate()` before persistence.
//! - Missing target rows are reported as outcomes, not errors.

pub mod story_repo;
