//! Error types for the core crate.

use thiserror::Error;

/// A task's due date could not be read as a calendar date.
///
/// This is the only way a recommendation can fail. It aborts the whole call;
/// no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date: {raw}")]
pub struct InvalidDateError {
    pub raw: String,
}

impl InvalidDateError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Errors raised by [`crate::TaskList`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskListError {
    #[error("Task not found: {0}")]
    NotFound(u64),
}
