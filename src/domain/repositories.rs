//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Book, Borrowing, Copy};

/// Uniform data-access contract, one instantiation per entity kind.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Persist a new entity under a freshly assigned id
    async fn create(&self, entity: T) -> Result<T, DomainError>;

    /// Find an entity by ID; a missing id is `Ok(None)`
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, DomainError>;

    /// Find all entities in insertion order
    async fn find_all(&self) -> Result<Vec<T>, DomainError>;

    /// Replace the stored attributes of an existing entity
    async fn update(&self, entity: T) -> Result<T, DomainError>;

    /// Delete an entity by ID after its consistency rules pass.
    /// Deleting a missing id succeeds without doing anything.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Reverse lookups over the one-directional references between records
#[async_trait]
pub trait RelationshipIndex: Send + Sync {
    /// Copies owned by a book, ordered by copy number
    async fn copies_of_book(&self, book_id: i32) -> Result<Vec<Copy>, DomainError>;

    /// Every borrowing (open or returned) made by a user
    async fn borrowings_of_user(&self, user_id: i32) -> Result<Vec<Borrowing>, DomainError>;

    /// Books whose publisher reference points at this publisher
    async fn books_of_publisher(&self, publisher_id: i32) -> Result<Vec<Book>, DomainError>;

    /// The open borrowing of a copy, if it is out on loan
    async fn borrowing_of_copy(&self, copy_id: i32) -> Result<Option<Borrowing>, DomainError>;
}
