use crate::db::errors::DbError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid input rejected before it reached the database
    #[error("{message}")]
    BadRequest { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] figment::Error),

    /// Applying or reverting a migration failed
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Internal { .. } => "Internal error".to_string(),
            Error::Config(e) => format!("Invalid configuration: {e}"),
            Error::Migrate(e) => format!("Migration failed: {e}"),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, constraint, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("customers"), Some("ix_customers_email")) => "A customer with this email address already exists".to_string(),
                    (Some("users"), Some("ix_users_email")) => "An account with this email address already exists".to_string(),
                    (Some("students"), Some("ix_students_email")) => "A student with this email address already exists".to_string(),
                    (Some("modules"), Some("ix_modules_training_course_id_order_number")) => {
                        "This course already has a module at that position".to_string()
                    }
                    (Some("daily_usage_statistics"), _) => "Usage for this virtual machine and date is already recorded".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { constraint, .. } => match constraint.as_deref() {
                    Some("fk_virtual_machines_vm_types_vm_type_id") => {
                        "VM type is still used by virtual machines and cannot be deleted".to_string()
                    }
                    _ => "Invalid reference to related resource".to_string(),
                },
                DbError::NotNullViolation { column, .. } => match column {
                    Some(column) => format!("Missing required field '{column}'"),
                    None => "Missing required field".to_string(),
                },
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::ValueTooLong { .. } => "A value exceeds its maximum length".to_string(),
                DbError::ProtectedEntity {
                    operation,
                    entity_type,
                    reason,
                    ..
                } => format!("Cannot {operation} {entity_type}: {reason}"),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal error".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;

    #[test]
    fn test_restrict_violation_message_names_vm_type() {
        let err = Error::Database(DbError::ForeignKeyViolation {
            constraint: Some("fk_virtual_machines_vm_types_vm_type_id".to_string()),
            table: Some("virtual_machines".to_string()),
            message: "update or delete on table \"vm_types\" violates foreign key constraint".to_string(),
        });
        assert!(err.user_message().contains("VM type is still used"));
    }

    #[test]
    fn test_protected_entity_message() {
        let err = Error::Database(DbError::ProtectedEntity {
            operation: Operation::Delete,
            reason: "seeded administrator".to_string(),
            entity_type: "user".to_string(),
            entity_id: Some("1".to_string()),
        });
        assert_eq!(err.user_message(), "Cannot delete user: seeded administrator");
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let err = Error::Other(anyhow::anyhow!("connection refused to 10.0.0.5"));
        assert_eq!(err.user_message(), "Internal error");
    }
}
