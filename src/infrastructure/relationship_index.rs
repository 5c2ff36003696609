//! Relationship index: reverse lookups over foreign-key columns
//!
//! References are stored one way only (a copy knows its book, a borrowing knows
//! its user and copy). These queries answer the other direction on demand,
//! backed by the secondary indexes created in `db::init_db`. The free functions
//! take any connection so the rule engine can run them inside a delete's
//! transaction; [`SeaOrmRelationshipIndex`] exposes them to callers.

use async_trait::async_trait;
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::domain::{CopyStatus, DomainError, RelationshipIndex};
use crate::models::{Book, Borrowing, Copy, book, borrowing, copy};

/// Copies owned by a book, ordered by copy number.
pub async fn copies_of_book<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
) -> Result<Vec<Copy>, DomainError> {
    copy::Entity::find()
        .filter(copy::Column::BookId.eq(book_id))
        .order_by_asc(copy::Column::CopyNumber)
        .all(conn)
        .await?
        .into_iter()
        .map(Copy::try_from)
        .collect()
}

pub async fn count_copies_of_book<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
) -> Result<u64, DomainError> {
    let count = copy::Entity::find()
        .filter(copy::Column::BookId.eq(book_id))
        .count(conn)
        .await?;
    Ok(count)
}

/// Ids of copies that are referenced by an open borrowing.
pub fn copies_on_loan() -> SelectStatement {
    Query::select()
        .column(borrowing::Column::CopyId)
        .from(borrowing::Entity)
        .and_where(borrowing::Column::ReturnDate.is_null())
        .to_owned()
}

/// Lowest-numbered copy of a book that can be lent right now.
///
/// A copy marked `Available` that still has an open borrowing is skipped.
pub async fn first_available_copy<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
) -> Result<Option<Copy>, DomainError> {
    copy::Entity::find()
        .filter(copy::Column::BookId.eq(book_id))
        .filter(copy::Column::Status.eq(CopyStatus::Available.as_str()))
        .filter(copy::Column::Id.not_in_subquery(copies_on_loan()))
        .order_by_asc(copy::Column::CopyNumber)
        .one(conn)
        .await?
        .map(Copy::try_from)
        .transpose()
}

pub async fn borrowings_of_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Vec<Borrowing>, DomainError> {
    let borrowings = borrowing::Entity::find()
        .filter(borrowing::Column::UserId.eq(user_id))
        .order_by_asc(borrowing::Column::Id)
        .all(conn)
        .await?;

    Ok(borrowings.into_iter().map(Borrowing::from).collect())
}

pub async fn count_borrowings_of_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<u64, DomainError> {
    let count = borrowing::Entity::find()
        .filter(borrowing::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn books_of_publisher<C: ConnectionTrait>(
    conn: &C,
    publisher_id: i32,
) -> Result<Vec<Book>, DomainError> {
    let books = book::Entity::find()
        .filter(book::Column::PublisherId.eq(publisher_id))
        .order_by_asc(book::Column::Id)
        .all(conn)
        .await?;

    Ok(books.into_iter().map(Book::from).collect())
}

pub async fn count_books_of_publisher<C: ConnectionTrait>(
    conn: &C,
    publisher_id: i32,
) -> Result<u64, DomainError> {
    let count = book::Entity::find()
        .filter(book::Column::PublisherId.eq(publisher_id))
        .count(conn)
        .await?;
    Ok(count)
}

/// The open borrowing of a copy, if it is currently out on loan.
pub async fn borrowing_of_copy<C: ConnectionTrait>(
    conn: &C,
    copy_id: i32,
) -> Result<Option<Borrowing>, DomainError> {
    let open = borrowing::Entity::find()
        .filter(borrowing::Column::CopyId.eq(copy_id))
        .filter(borrowing::Column::ReturnDate.is_null())
        .one(conn)
        .await?;

    Ok(open.map(Borrowing::from))
}

/// SeaORM-based implementation of RelationshipIndex
pub struct SeaOrmRelationshipIndex {
    db: DatabaseConnection,
}

impl SeaOrmRelationshipIndex {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationshipIndex for SeaOrmRelationshipIndex {
    async fn copies_of_book(&self, book_id: i32) -> Result<Vec<Copy>, DomainError> {
        copies_of_book(&self.db, book_id).await
    }

    async fn borrowings_of_user(&self, user_id: i32) -> Result<Vec<Borrowing>, DomainError> {
        borrowings_of_user(&self.db, user_id).await
    }

    async fn books_of_publisher(&self, publisher_id: i32) -> Result<Vec<Book>, DomainError> {
        books_of_publisher(&self.db, publisher_id).await
    }

    async fn borrowing_of_copy(&self, copy_id: i32) -> Result<Option<Borrowing>, DomainError> {
        borrowing_of_copy(&self.db, copy_id).await
    }
}
