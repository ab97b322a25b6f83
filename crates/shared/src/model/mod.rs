mod user;
pub use user::*;

mod exercise;
pub use exercise::*;

mod plan;
pub use plan::*;

use crate::api::error::ValidationError;

/// Failure of a write that checks references before touching the database
#[cfg(feature = "backend")]
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// True if `err` is SQLite rejecting a row that duplicates a unique key
#[cfg(feature = "backend")]
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    use rusqlite::{ffi, ErrorCode};

    matches!(
        err,
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ErrorCode::ConstraintViolation,
                extended_code: ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        )
    )
}

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Pushes a message onto `errors` if `value` is longer than `max` characters
pub(crate) fn check_max_len(errors: &mut ValidationError, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(format!("{field} must be at most {max} characters"));
    }
}

/// Pushes a message onto `errors` if `value` is blank
pub(crate) fn check_not_blank(errors: &mut ValidationError, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} can't be blank"));
    }
}
