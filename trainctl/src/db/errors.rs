use crate::types::Operation;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLSTATE for `string_data_right_truncation` (a value longer than its VARCHAR limit)
const STRING_TOO_LONG: &str = "22001";

/// Unified error type for database operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
        /// The conflicting value that caused the violation (if extractable)
        conflicting_value: Option<String>,
    },

    /// Foreign key constraint violation. Also raised when an `ON DELETE RESTRICT` parent is deleted.
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// A required column was written as NULL
    #[error("Not-null constraint violation")]
    NotNullViolation {
        column: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// A value exceeded its column's length limit
    #[error("Value too long: {message}")]
    ValueTooLong { message: String },

    /// Entity cannot be modified or deleted due to protection rules
    #[error("{operation} cannot be applied to entity of type {entity_type}: {reason}")]
    ProtectedEntity {
        operation: Operation,
        reason: String,
        entity_type: String,
        entity_id: Option<String>,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// Name of the violated constraint or index, if this is a constraint error
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::UniqueViolation { constraint, .. }
            | DbError::ForeignKeyViolation { constraint, .. }
            | DbError::CheckViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                match db_err.kind() {
                    ErrorKind::UniqueViolation => {
                        let conflicting_value = db_err
                            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                            .and_then(|pg_err| pg_err.detail())
                            .and_then(extract_conflicting_value);

                        DbError::UniqueViolation {
                            constraint: db_err.constraint().map(|s| s.to_string()),
                            table,
                            message,
                            conflicting_value,
                        }
                    }
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table,
                        message,
                    },
                    ErrorKind::NotNullViolation => DbError::NotNullViolation {
                        column: db_err
                            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                            .and_then(|pg_err| pg_err.column())
                            .map(|s| s.to_string()),
                        table,
                        message,
                    },
                    ErrorKind::CheckViolation => DbError::CheckViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table,
                        message,
                    },
                    _ if db_err.code().as_deref() == Some(STRING_TOO_LONG) => DbError::ValueTooLong { message },
                    // All other database errors are non-recoverable - convert to anyhow
                    _ => DbError::Other(anyhow::Error::from(err)),
                }
            }
            // All other sqlx errors are non-recoverable - convert to anyhow with context
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Extract the conflicting value from a PostgreSQL unique violation detail message.
///
/// Details look like `Key (email)=(contact@acme.com) already exists.`; composite keys yield
/// the comma-separated tuple, e.g. `1, 2`.
fn extract_conflicting_value(detail: &str) -> Option<String> {
    let start = detail.find("=(")?;
    let rest = &detail[start + 2..];
    let end = rest.rfind(") already exists")?;
    Some(rest[..end].to_string())
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_conflicting_value_single_column() {
        let detail = "Key (email)=(contact@acme.com) already exists.";
        assert_eq!(extract_conflicting_value(detail).as_deref(), Some("contact@acme.com"));
    }

    #[test]
    fn test_extract_conflicting_value_composite_key() {
        let detail = "Key (training_course_id, order_number)=(3, 1) already exists.";
        assert_eq!(extract_conflicting_value(detail).as_deref(), Some("3, 1"));
    }

    #[test]
    fn test_extract_conflicting_value_unrecognised_detail() {
        assert_eq!(extract_conflicting_value("something else entirely"), None);
    }

    #[test]
    fn test_constraint_accessor() {
        let err = DbError::UniqueViolation {
            constraint: Some("ix_customers_email".to_string()),
            table: Some("customers".to_string()),
            message: "duplicate key".to_string(),
            conflicting_value: None,
        };
        assert_eq!(err.constraint(), Some("ix_customers_email"));
        assert_eq!(DbError::NotFound.constraint(), None);
    }
}
