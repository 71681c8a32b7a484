//! Storage-specific error types for SQLite operations.
//!
//! Diesel and r2d2 errors are wrapped here and converted to the
//! database-agnostic errors defined in `tallyfolio_core` at the crate boundary.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tallyfolio_core::errors::{DatabaseError, Error};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    /// A stored value could not be read back into its domain type.
    #[error("Corrupt stored value in {column}: {message}")]
    CorruptValue { column: &'static str, message: String },

    /// A core error raised inside a write job; passed through unchanged.
    #[error(transparent)]
    Core(Box<Error>),
}

impl StorageError {
    pub fn corrupt(column: &'static str, message: impl ToString) -> Self {
        StorageError::CorruptValue {
            column,
            message: message.to_string(),
        }
    }
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(Box::new(err))
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            e @ StorageError::CorruptValue { .. } => {
                Error::Database(DatabaseError::Internal(e.to_string()))
            }
            StorageError::Core(e) => *e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallyfolio_core::errors::ValidationError;

    #[test]
    fn test_not_found_maps_to_database_not_found() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[test]
    fn test_core_errors_pass_through_the_writer_unchanged() {
        let original = Error::Validation(ValidationError::MissingField("email".to_string()));
        let err: Error = StorageError::from(original).into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "email"
        ));
    }

    #[test]
    fn test_corrupt_value_is_internal() {
        let err: Error = StorageError::corrupt("users.default_currency", "EUR").into();
        assert!(matches!(err, Error::Database(DatabaseError::Internal(_))));
    }
}
