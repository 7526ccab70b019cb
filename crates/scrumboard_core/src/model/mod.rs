//! Board domain model.
//!
//! # Responsibility
//! - Define the story record and its status enumeration.
//!
//! # Invariants
//! - Deletion is permanent; there is no tombstone state.

pub mod story;
