//! Lending Service - Pure business logic for lending and returning copies

use chrono::NaiveDate;
use sea_orm::*;
use std::collections::HashMap;

use super::ServiceError;
use crate::domain::StatusRequest;
use crate::infrastructure::record_store;
use crate::infrastructure::relationship_index as index;
use crate::models::book::Entity as BookEntity;
use crate::models::borrowing::{self, Entity as BorrowingEntity};
use crate::models::copy::Entity as CopyEntity;
use crate::models::{Book, Borrowing, Copy, User};

/// Request to lend one copy of a book to a user
#[derive(Debug, Clone)]
pub struct LendRequest {
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: NaiveDate,
}

/// Borrowing enriched with the title of the borrowed book
#[derive(Debug, Clone, serde::Serialize)]
pub struct BorrowingWithDetails {
    pub borrowing: Borrowing,
    pub copy_number: Option<i32>,
    pub book_title: String,
}

/// Lend the lowest-numbered available copy of a book.
///
/// Opens a borrowing and marks the copy as borrowed in one transaction.
pub async fn lend_book(
    db: &DatabaseConnection,
    request: LendRequest,
) -> Result<Borrowing, ServiceError> {
    let txn = db.begin().await?;

    // 1. Check that both ends of the loan exist
    if record_store::find::<User, _>(&txn, request.user_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(format!("User {}", request.user_id)));
    }
    if record_store::find::<Book, _>(&txn, request.book_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(format!("Book {}", request.book_id)));
    }

    // 2. Pick a copy on the shelf
    let mut copy = index::first_available_copy(&txn, request.book_id)
        .await?
        .ok_or_else(|| {
            ServiceError::InvalidState(format!(
                "No available copies for book {}",
                request.book_id
            ))
        })?;
    let copy_id = copy
        .id
        .ok_or_else(|| ServiceError::NotFound("Copy".to_string()))?;

    // 3. Open the borrowing
    let borrowing = record_store::insert(
        &txn,
        Borrowing::open(request.user_id, copy_id, request.borrow_date),
    )
    .await?;

    // 4. Mark the copy as borrowed
    copy.status = copy.status.apply(StatusRequest::Lend);
    record_store::replace(&txn, copy).await?;

    txn.commit().await?;

    tracing::info!(
        "Copy {} of book {} lent to user {}",
        copy_id,
        request.book_id,
        request.user_id
    );

    Ok(borrowing)
}

/// Close a borrowing and put its copy back on the shelf
pub async fn return_borrowing(
    db: &DatabaseConnection,
    borrowing_id: i32,
    return_date: NaiveDate,
) -> Result<Borrowing, ServiceError> {
    let txn = db.begin().await?;

    // 1. Find Borrowing
    let mut borrowing = record_store::find::<Borrowing, _>(&txn, borrowing_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Borrowing {}", borrowing_id)))?;

    if !borrowing.is_open() {
        return Err(ServiceError::InvalidState(
            "Borrowing is already returned".to_string(),
        ));
    }
    if return_date < borrowing.borrow_date {
        return Err(ServiceError::InvalidState(format!(
            "Return date {} is before borrow date {}",
            return_date, borrowing.borrow_date
        )));
    }

    // 2. Close it
    borrowing.return_date = Some(return_date);
    let copy_id = borrowing.copy_id;
    let borrowing = record_store::replace(&txn, borrowing).await?;

    // 3. Release the copy
    match record_store::find::<Copy, _>(&txn, copy_id).await? {
        Some(mut copy) => {
            copy.status = copy.status.apply(StatusRequest::Release);
            record_store::replace(&txn, copy).await?;
        }
        None => tracing::warn!(
            "Borrowing {} references missing copy {}",
            borrowing_id,
            copy_id
        ),
    }

    txn.commit().await?;
    tracing::info!("Borrowing {} returned on {}", borrowing_id, return_date);

    Ok(borrowing)
}

/// Every borrowing of a user, most recent first, with the borrowed book's title
pub async fn borrowing_history(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<BorrowingWithDetails>, ServiceError> {
    let borrowings_with_copies = BorrowingEntity::find()
        .filter(borrowing::Column::UserId.eq(user_id))
        .order_by_desc(borrowing::Column::BorrowDate)
        .order_by_desc(borrowing::Column::Id)
        .find_also_related(CopyEntity)
        .all(db)
        .await?;

    // Collect book IDs to fetch titles
    let book_ids: Vec<i32> = borrowings_with_copies
        .iter()
        .filter_map(|(_, copy)| copy.as_ref().map(|c| c.book_id))
        .collect();

    let mut titles: HashMap<i32, String> = HashMap::new();

    if !book_ids.is_empty() {
        let books = BookEntity::find()
            .filter(crate::models::book::Column::Id.is_in(book_ids))
            .all(db)
            .await?;

        for book in books {
            titles.insert(book.id, book.title);
        }
    }

    let history = borrowings_with_copies
        .into_iter()
        .map(|(borrowing, copy)| {
            let book_title = copy
                .as_ref()
                .and_then(|c| titles.get(&c.book_id).cloned())
                .unwrap_or_else(|| "Unknown".to_string());

            BorrowingWithDetails {
                borrowing: Borrowing::from(borrowing),
                copy_number: copy.map(|c| c.copy_number),
                book_title,
            }
        })
        .collect();

    Ok(history)
}
