//! Catalog Service - cataloguing workflows for books and their copies

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};

use super::ServiceError;
use crate::domain::{CopyStatus, StatusRequest};
use crate::infrastructure::record_store;
use crate::infrastructure::relationship_index as index;
use crate::models::{Book, Copy, book, copy};

/// Catalogue a book together with `copies` physical copies numbered from 1.
///
/// The book and all its copies are inserted in one transaction.
pub async fn add_book_with_copies(
    db: &DatabaseConnection,
    book: Book,
    copies: u32,
) -> Result<(Book, Vec<Copy>), ServiceError> {
    if copies == 0 {
        return Err(ServiceError::InvalidState(
            "Number of copies must be greater than 0".to_string(),
        ));
    }
    let last_number = i32::try_from(copies).map_err(|_| {
        ServiceError::InvalidState(format!("Cannot catalogue {} copies of one book", copies))
    })?;

    let txn = db.begin().await?;

    let book = record_store::insert(&txn, book).await?;
    let book_id = book
        .id
        .ok_or_else(|| ServiceError::NotFound("Book".to_string()))?;

    let mut created = Vec::new();
    for number in 1..=last_number {
        let copy = Copy::new(book_id, number, CopyStatus::Available);
        created.push(record_store::insert(&txn, copy).await?);
    }

    txn.commit().await?;

    tracing::info!(
        "Catalogued book {} '{}' with {} copies",
        book_id,
        book.title,
        created.len()
    );

    Ok((book, created))
}

/// Books with at least one copy that can be lent right now
pub async fn available_books(db: &DatabaseConnection) -> Result<Vec<Book>, ServiceError> {
    let book_ids: Vec<i32> = copy::Entity::find()
        .select_only()
        .column(copy::Column::BookId)
        .filter(copy::Column::Status.eq(CopyStatus::Available.as_str()))
        .filter(copy::Column::Id.not_in_subquery(index::copies_on_loan()))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    if book_ids.is_empty() {
        return Ok(Vec::new());
    }

    let books = book::Entity::find()
        .filter(book::Column::Id.is_in(book_ids))
        .order_by_asc(book::Column::Id)
        .all(db)
        .await?;

    Ok(books.into_iter().map(Book::from).collect())
}

/// Take a copy out of circulation.
pub async fn withdraw_copy(db: &DatabaseConnection, copy_id: i32) -> Result<Copy, ServiceError> {
    let txn = db.begin().await?;

    let mut copy = record_store::find::<Copy, _>(&txn, copy_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Copy {}", copy_id)))?;

    if let Some(open) = index::borrowing_of_copy(&txn, copy_id).await? {
        tracing::warn!(
            "Withdrawing copy {} while borrowing {:?} is still open",
            copy_id,
            open.id
        );
    }

    copy.status = copy.status.apply(StatusRequest::Withdraw);
    let copy = record_store::replace(&txn, copy).await?;

    txn.commit().await?;
    tracing::info!("Copy {} withdrawn", copy_id);
    Ok(copy)
}

/// Put a withdrawn copy back on the shelf.
pub async fn reinstate_copy(db: &DatabaseConnection, copy_id: i32) -> Result<Copy, ServiceError> {
    let txn = db.begin().await?;

    let mut copy = record_store::find::<Copy, _>(&txn, copy_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Copy {}", copy_id)))?;

    if copy.status != CopyStatus::Withdrawn {
        return Err(ServiceError::InvalidState(format!(
            "Copy {} is {}, not withdrawn",
            copy_id, copy.status
        )));
    }

    copy.status = copy.status.apply(StatusRequest::Reinstate);
    let copy = record_store::replace(&txn, copy).await?;

    txn.commit().await?;
    tracing::info!("Copy {} reinstated", copy_id);
    Ok(copy)
}
