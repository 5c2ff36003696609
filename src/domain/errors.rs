//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

use super::rules::Violation;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Uniqueness or required-field rule broken at create/update time
    ConstraintViolation(String),
    /// A relationship rule blocked a delete; the record is unchanged
    PreconditionViolation(Violation),
    /// Database/persistence error
    Database(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::ConstraintViolation(msg) => write!(f, "Constraint violation: {}", msg),
            DomainError::PreconditionViolation(rule) => {
                write!(f, "Precondition violation: {}", rule)
            }
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg))
            | Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(msg)) => {
                DomainError::ConstraintViolation(msg)
            }
            _ => DomainError::Database(e.to_string()),
        }
    }
}
