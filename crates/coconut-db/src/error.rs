//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sqlx::Error        row that fails to decode     DeliveryRules::new    │
//! │       │                      │                          │               │
//! │       ▼                      ▼                          ▼               │
//! │  DbError::{NotFound,   DbError::CorruptRow     DbError::InvalidRules   │
//! │   UniqueViolation, ...}                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (coconut-service) ← What the caller sees                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use coconut_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `update` or `delete` touched no row
    /// - ID doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A second zone rule or delivery zone with the same name
    /// - A second negotiated price for the same customer and unit type
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A CHECK constraint rejected the row (e.g., `min_qty >= max_qty`).
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// A stored row cannot be turned back into a rule.
    ///
    /// ## When This Occurs
    /// - Cutoff text that is not `HH:MM`
    /// - Negative or oversized integers written by another tool
    #[error("Corrupt {table} row {id}: {reason}")]
    CorruptRow {
        table: &'static str,
        id: String,
        reason: String,
    },

    /// The stored tables do not form a valid rule set.
    #[error(transparent)]
    InvalidRules(#[from] CoreError),

    /// The database file could not be opened or created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for a reason not covered above.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(table: &'static str, id: impl Into<String>, reason: impl ToString) -> Self {
        DbError::CorruptRow {
            table,
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Maps sqlx failures onto the categories callers branch on.
///
/// SQLite reports the failing column as `UNIQUE constraint failed:
/// <table>.<column>`; the `<table>.<column>` part becomes `field`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    let field = db_err
                        .message()
                        .rsplit(": ")
                        .next()
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::duplicate(field, "unknown")
                }
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    DbError::ConstraintViolation {
                        message: db_err.message().to_string(),
                    }
                }
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
