//! Consistency rule engine
//!
//! Drives `domain::rules` against live data: counts the blocking relationships
//! through the relationship index, asks the rules for a verdict, and applies
//! the resulting cascades. Callers pass the delete's transaction so the check,
//! the removal and the cascades commit or roll back together.

use sea_orm::ConnectionTrait;

use crate::domain::rules::{self, Dependents};
use crate::domain::{Cascade, DeleteTarget, DomainError, StatusRequest};
use crate::infrastructure::record_store;
use crate::infrastructure::relationship_index as index;
use crate::models::Copy;

/// Check the delete precondition for `target`.
///
/// Returns the cascades to apply once the record is gone, or
/// `DomainError::PreconditionViolation` naming the broken rule.
pub async fn enforce_delete<C: ConnectionTrait>(
    conn: &C,
    target: &DeleteTarget,
) -> Result<Vec<Cascade>, DomainError> {
    let id = target.id();
    let dependents = match target.dependents() {
        Some(Dependents::CopiesOfBook) => index::count_copies_of_book(conn, id).await?,
        Some(Dependents::BooksOfPublisher) => index::count_books_of_publisher(conn, id).await?,
        Some(Dependents::BorrowingsOfUser) => index::count_borrowings_of_user(conn, id).await?,
        None => 0,
    };

    rules::evaluate_delete(target, dependents).map_err(|violation| {
        tracing::info!(
            "Delete of {} {} rejected: {}",
            target.kind(),
            id,
            violation
        );
        DomainError::PreconditionViolation(violation)
    })
}

/// Apply the side effects of a successful delete.
pub async fn apply_cascades<C: ConnectionTrait>(
    conn: &C,
    cascades: &[Cascade],
) -> Result<(), DomainError> {
    for cascade in cascades {
        match *cascade {
            Cascade::ReleaseCopy { copy_id } => {
                let Some(mut copy) = record_store::find::<Copy, C>(conn, copy_id).await? else {
                    tracing::warn!("Cannot release copy {}: it no longer exists", copy_id);
                    continue;
                };

                copy.status = copy.status.apply(StatusRequest::Release);
                record_store::replace(conn, copy).await?;
                tracing::debug!("Copy {} released", copy_id);
            }
        }
    }

    Ok(())
}
