//! Services Layer
//!
//! Multi-step workflows (lending, returning, cataloguing) built on the record
//! store and relationship index. Each workflow runs in a single transaction.

use std::fmt;

use crate::domain::DomainError;

pub mod catalog_service;
pub mod lending_service;

// Re-export for convenience
pub use catalog_service::*;
pub use lending_service::*;

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Domain(DomainError),
    /// A referenced record does not exist
    NotFound(String),
    /// The request is valid but the current state does not allow it
    InvalidState(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Domain(e) => write!(f, "{}", e),
            ServiceError::NotFound(what) => write!(f, "{} not found", what),
            ServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ServiceError::NotFound("Record".to_string()),
            other => ServiceError::Domain(other),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Domain(DomainError::from(e))
    }
}
