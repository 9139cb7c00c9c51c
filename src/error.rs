//! Error types for the mxr library.
//!
//! This module provides custom error types using `thiserror` and classifies
//! SQLite failures so that callers can tell a broken constraint apart from an
//! unavailable store. The lookup registry relies on this distinction to absorb
//! lost insert races.

use thiserror::Error;

/// Which class of storage constraint was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A UNIQUE constraint (including composite uniques)
    Unique,
    /// A PRIMARY KEY constraint
    PrimaryKey,
    /// A FOREIGN KEY constraint
    ForeignKey,
    /// A NOT NULL constraint
    NotNull,
    /// A CHECK constraint (used for the measurement length bound)
    Check,
    /// Any other constraint class reported by SQLite
    Other,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::PrimaryKey => "primary key",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not null",
            Self::Check => "check",
            Self::Other => "constraint",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in the mxr library.
#[derive(Error, Debug)]
pub enum MxrError {
    /// A storage-enforced rule was broken (uniqueness, not-null, foreign key,
    /// length). `constraint` identifies the failed rule, e.g.
    /// `"ingredients.name"` or `"measurement_len"`.
    #[error("{kind} constraint violated: {constraint}")]
    ConstraintViolation {
        /// Class of the broken constraint
        kind: ConstraintKind,
        /// Identifier of the broken constraint as reported by SQLite
        constraint: String,
    },

    /// A lookup returned no match
    #[error("not found: {0}")]
    NotFound(String),

    /// The store could not be reached or stayed busy beyond the configured timeout
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An entity was manipulated without a backing row in the store
    #[error("no backing row: {0}")]
    SessionBinding(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors during bulk ingestion
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Any other SQLite error
    #[error("database error: {0}")]
    Store(rusqlite::Error),
}

/// Convenience type alias for Result with MxrError
pub type Result<T> = std::result::Result<T, MxrError>;

impl MxrError {
    /// True if this is a unique-constraint violation on the given constraint
    /// identifier. The lookup registry uses this to detect a lost insert race.
    #[must_use]
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(
            self,
            Self::ConstraintViolation { kind: ConstraintKind::Unique, constraint } if constraint.as_str() == name
        )
    }
}

/// Pull the constraint identifier out of an SQLite message such as
/// `"UNIQUE constraint failed: ingredients.name"`.
fn constraint_name(message: Option<&str>) -> String {
    message
        .and_then(|m| m.split_once(": ").map(|(_, name)| name.trim().to_string()))
        .or_else(|| message.map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<rusqlite::Error> for MxrError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi;
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(cause, message) => match cause.code {
                ErrorCode::ConstraintViolation => {
                    let kind = match cause.extended_code {
                        ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
                        ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
                        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                        ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
                        ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
                        _ => ConstraintKind::Other,
                    };
                    Self::ConstraintViolation {
                        kind,
                        constraint: constraint_name(message.as_deref()),
                    }
                },
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen => {
                    Self::StoreUnavailable(err.to_string())
                },
                _ => Self::Store(err),
            },
            _ => Self::Store(err),
        }
    }
}

impl From<r2d2::Error> for MxrError {
    fn from(err: r2d2::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
