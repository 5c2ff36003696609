//! Domain layer - Pure business abstractions
//!
//! Trait definitions, domain error types, the copy status state machine and
//! the consistency rules that govern deletes.

pub mod errors;
pub mod repositories;
pub mod rules;
pub mod status;

pub use errors::DomainError;
pub use repositories::*;
pub use rules::{Cascade, DeleteTarget, EntityKind, Violation};
pub use status::{CopyStatus, StatusRequest};
