//! Consistency rules for deletes
//!
//! Pure decision logic: given what is being deleted and how many live records
//! still depend on it, decide whether the delete may proceed and which
//! follow-up changes must be committed with it. Gathering the counts and
//! applying the cascades is the infrastructure layer's job
//! (`infrastructure::rule_engine`).

use std::fmt;

use super::status::CopyStatus;

/// Entity kinds managed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Book,
    Copy,
    Publisher,
    User,
    Borrowing,
    Librarian,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Book => "book",
            EntityKind::Copy => "copy",
            EntityKind::Publisher => "publisher",
            EntityKind::User => "user",
            EntityKind::Borrowing => "borrowing",
            EntityKind::Librarian => "librarian",
        };
        f.write_str(name)
    }
}

/// The record about to be deleted, with the attributes the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Book { id: i32 },
    Copy { id: i32, status: CopyStatus },
    Publisher { id: i32 },
    User { id: i32 },
    Borrowing { id: i32, copy_id: i32 },
    Librarian { id: i32 },
}

impl DeleteTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            DeleteTarget::Book { .. } => EntityKind::Book,
            DeleteTarget::Copy { .. } => EntityKind::Copy,
            DeleteTarget::Publisher { .. } => EntityKind::Publisher,
            DeleteTarget::User { .. } => EntityKind::User,
            DeleteTarget::Borrowing { .. } => EntityKind::Borrowing,
            DeleteTarget::Librarian { .. } => EntityKind::Librarian,
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            DeleteTarget::Book { id }
            | DeleteTarget::Copy { id, .. }
            | DeleteTarget::Publisher { id }
            | DeleteTarget::User { id }
            | DeleteTarget::Borrowing { id, .. }
            | DeleteTarget::Librarian { id } => id,
        }
    }

    /// Which relationship count the precondition depends on, if any.
    pub fn dependents(&self) -> Option<Dependents> {
        match self {
            DeleteTarget::Book { .. } => Some(Dependents::CopiesOfBook),
            DeleteTarget::Publisher { .. } => Some(Dependents::BooksOfPublisher),
            DeleteTarget::User { .. } => Some(Dependents::BorrowingsOfUser),
            DeleteTarget::Copy { .. }
            | DeleteTarget::Borrowing { .. }
            | DeleteTarget::Librarian { .. } => None,
        }
    }
}

/// Reverse relationships a delete precondition can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependents {
    CopiesOfBook,
    BooksOfPublisher,
    BorrowingsOfUser,
}

/// A broken delete precondition, identifying the rule that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    BookHasCopies { book_id: i32, copies: u64 },
    CopyIsBorrowed { copy_id: i32 },
    PublisherHasBooks { publisher_id: i32, books: u64 },
    UserHasBorrowings { user_id: i32, borrowings: u64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BookHasCopies { book_id, copies } => write!(
                f,
                "cannot delete book {} while it still has {} copies",
                book_id, copies
            ),
            Violation::CopyIsBorrowed { copy_id } => {
                write!(f, "cannot delete copy {} while it is borrowed", copy_id)
            }
            Violation::PublisherHasBooks {
                publisher_id,
                books,
            } => write!(
                f,
                "cannot delete publisher {} while {} books reference it",
                publisher_id, books
            ),
            Violation::UserHasBorrowings {
                user_id,
                borrowings,
            } => write!(
                f,
                "cannot delete user {} while they have {} borrowings",
                user_id, borrowings
            ),
        }
    }
}

/// Change that must be committed atomically with a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    /// Put the copy back to `Available`
    ReleaseCopy { copy_id: i32 },
}

/// Decide whether `target` may be deleted.
///
/// `dependents` is the live count of the relationship named by
/// [`DeleteTarget::dependents`]; it is ignored for targets without one.
pub fn evaluate_delete(target: &DeleteTarget, dependents: u64) -> Result<Vec<Cascade>, Violation> {
    match *target {
        DeleteTarget::Book { id } if dependents > 0 => Err(Violation::BookHasCopies {
            book_id: id,
            copies: dependents,
        }),
        DeleteTarget::Copy { id, status } if status.blocks_delete() => {
            Err(Violation::CopyIsBorrowed { copy_id: id })
        }
        DeleteTarget::Publisher { id } if dependents > 0 => Err(Violation::PublisherHasBooks {
            publisher_id: id,
            books: dependents,
        }),
        DeleteTarget::User { id } if dependents > 0 => Err(Violation::UserHasBorrowings {
            user_id: id,
            borrowings: dependents,
        }),
        DeleteTarget::Borrowing { copy_id, .. } => Ok(vec![Cascade::ReleaseCopy { copy_id }]),
        _ => Ok(Vec::new()),
    }
}
