use chrono::NaiveDate;
use lending_catalog::Catalog;
use lending_catalog::db;
use lending_catalog::domain::{CopyStatus, DomainError, Violation};
use lending_catalog::models::{Book, User};
use lending_catalog::seed;
use lending_catalog::services::{self, LendRequest, ServiceError};

async fn setup_test_catalog() -> Catalog {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    Catalog::new(db)
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

async fn catalogue(catalog: &Catalog, title: &str, isbn: &str, copies: u32) -> i32 {
    let (book, _) = services::add_book_with_copies(
        catalog.db(),
        Book::new(title, "Test Author", 1999, isbn),
        copies,
    )
    .await
    .expect("Failed to catalogue book");
    book.id.expect("book id")
}

async fn register(catalog: &Catalog, name: &str) -> i32 {
    catalog
        .users
        .create(User::new(
            name,
            &format!("{}@example.org", name.to_lowercase()),
            "555-0100",
            "Somewhere",
        ))
        .await
        .expect("Failed to create user")
        .id
        .expect("user id")
}

fn lend(user_id: i32, book_id: i32, borrow_date: NaiveDate) -> LendRequest {
    LendRequest {
        user_id,
        book_id,
        borrow_date,
    }
}

#[tokio::test]
async fn test_add_book_with_copies_numbers_from_one() {
    let catalog = setup_test_catalog().await;

    let (book, copies) = services::add_book_with_copies(
        catalog.db(),
        Book::new("Dune", "Frank Herbert", 1965, "978-0441172719"),
        3,
    )
    .await
    .unwrap();

    let numbers: Vec<i32> = copies.iter().map(|c| c.copy_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(copies.iter().all(|c| c.status == CopyStatus::Available));
    assert!(copies.iter().all(|c| c.book_id == book.id.unwrap()));
}

#[tokio::test]
async fn test_add_book_with_zero_copies_is_rejected() {
    let catalog = setup_test_catalog().await;

    let result = services::add_book_with_copies(
        catalog.db(),
        Book::new("Ghost", "Nobody", 2000, "isbn-ghost"),
        0,
    )
    .await;

    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
    assert!(catalog.books.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_book_with_duplicate_isbn_leaves_nothing_behind() {
    let catalog = setup_test_catalog().await;
    catalogue(&catalog, "Original", "isbn-dup", 1).await;

    let result = services::add_book_with_copies(
        catalog.db(),
        Book::new("Copycat", "Other", 2001, "isbn-dup"),
        2,
    )
    .await;

    assert!(matches!(
        result,
        Err(ServiceError::Domain(DomainError::ConstraintViolation(_)))
    ));
    assert_eq!(catalog.books.find_all().await.unwrap().len(), 1);
    assert_eq!(catalog.copies.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lend_picks_lowest_available_copy() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Mockingbird", "isbn-mock", 2).await;
    let alice = register(&catalog, "Alice").await;
    let bob = register(&catalog, "Bob").await;

    let first = services::lend_book(catalog.db(), lend(alice, book_id, date(1, 5)))
        .await
        .unwrap();
    let second = services::lend_book(catalog.db(), lend(bob, book_id, date(1, 6)))
        .await
        .unwrap();

    let copies = catalog.index.copies_of_book(book_id).await.unwrap();
    assert_eq!(first.copy_id, copies[0].id.unwrap());
    assert_eq!(second.copy_id, copies[1].id.unwrap());
    assert!(copies.iter().all(|c| c.status == CopyStatus::Borrowed));
    assert!(first.is_open() && second.is_open());
}

#[tokio::test]
async fn test_lend_without_available_copy_is_invalid_state() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Rare", "isbn-rare", 1).await;
    let alice = register(&catalog, "Alice").await;
    let bob = register(&catalog, "Bob").await;

    services::lend_book(catalog.db(), lend(alice, book_id, date(2, 1)))
        .await
        .unwrap();

    let result = services::lend_book(catalog.db(), lend(bob, book_id, date(2, 2))).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
    assert_eq!(catalog.borrowings.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lend_skips_withdrawn_copies() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Worn", "isbn-worn", 2).await;
    let alice = register(&catalog, "Alice").await;

    let copies = catalog.index.copies_of_book(book_id).await.unwrap();
    services::withdraw_copy(catalog.db(), copies[0].id.unwrap())
        .await
        .unwrap();

    let borrowing = services::lend_book(catalog.db(), lend(alice, book_id, date(3, 1)))
        .await
        .unwrap();
    assert_eq!(borrowing.copy_id, copies[1].id.unwrap());
}

#[tokio::test]
async fn test_lend_unknown_user_or_book_is_not_found() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Real", "isbn-real", 1).await;
    let alice = register(&catalog, "Alice").await;

    let result = services::lend_book(catalog.db(), lend(999, book_id, date(1, 1))).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    let result = services::lend_book(catalog.db(), lend(alice, 999, date(1, 1))).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    // Nothing changed
    assert!(catalog.borrowings.find_all().await.unwrap().is_empty());
    let copies = catalog.index.copies_of_book(book_id).await.unwrap();
    assert_eq!(copies[0].status, CopyStatus::Available);
}

#[tokio::test]
async fn test_return_releases_copy() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Gatsby", "isbn-gatsby", 1).await;
    let alice = register(&catalog, "Alice").await;

    let borrowing = services::lend_book(catalog.db(), lend(alice, book_id, date(1, 1)))
        .await
        .unwrap();
    assert!(services::available_books(catalog.db()).await.unwrap().is_empty());

    let returned = services::return_borrowing(catalog.db(), borrowing.id.unwrap(), date(1, 15))
        .await
        .unwrap();
    assert_eq!(returned.return_date, Some(date(1, 15)));
    assert!(!returned.is_open());

    let copy = catalog
        .copies
        .find_by_id(borrowing.copy_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.status, CopyStatus::Available);
    assert!(catalog.index.borrowing_of_copy(copy.id.unwrap()).await.unwrap().is_none());

    let available = services::available_books(catalog.db()).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, Some(book_id));
}

#[tokio::test]
async fn test_return_twice_is_invalid_state() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Twice", "isbn-twice", 1).await;
    let alice = register(&catalog, "Alice").await;

    let borrowing = services::lend_book(catalog.db(), lend(alice, book_id, date(4, 1)))
        .await
        .unwrap();
    let id = borrowing.id.unwrap();

    services::return_borrowing(catalog.db(), id, date(4, 2)).await.unwrap();
    let result = services::return_borrowing(catalog.db(), id, date(4, 3)).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));

    let stored = catalog.borrowings.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.return_date, Some(date(4, 2)));
}

#[tokio::test]
async fn test_return_before_borrow_date_is_invalid_state() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Early", "isbn-early", 1).await;
    let alice = register(&catalog, "Alice").await;

    let borrowing = services::lend_book(catalog.db(), lend(alice, book_id, date(5, 10)))
        .await
        .unwrap();

    let result = services::return_borrowing(catalog.db(), borrowing.id.unwrap(), date(5, 9)).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));

    let copy = catalog
        .copies
        .find_by_id(borrowing.copy_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.status, CopyStatus::Borrowed);
}

#[tokio::test]
async fn test_return_unknown_borrowing_is_not_found() {
    let catalog = setup_test_catalog().await;
    let result = services::return_borrowing(catalog.db(), 404, date(1, 1)).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_borrowing_history_is_most_recent_first() {
    let catalog = setup_test_catalog().await;
    let gatsby = catalogue(&catalog, "The Great Gatsby", "isbn-g", 1).await;
    let orwell = catalogue(&catalog, "1984", "isbn-o", 1).await;
    let alice = register(&catalog, "Alice").await;
    let bob = register(&catalog, "Bob").await;

    let old = services::lend_book(catalog.db(), lend(alice, gatsby, date(1, 1)))
        .await
        .unwrap();
    services::return_borrowing(catalog.db(), old.id.unwrap(), date(1, 10))
        .await
        .unwrap();
    services::lend_book(catalog.db(), lend(alice, orwell, date(2, 1)))
        .await
        .unwrap();
    services::lend_book(catalog.db(), lend(bob, gatsby, date(2, 3)))
        .await
        .unwrap();

    let history = services::borrowing_history(catalog.db(), alice).await.unwrap();
    let titles: Vec<&str> = history.iter().map(|h| h.book_title.as_str()).collect();
    assert_eq!(titles, vec!["1984", "The Great Gatsby"]);
    assert!(history[0].borrowing.is_open());
    assert_eq!(history[1].borrowing.return_date, Some(date(1, 10)));
    assert_eq!(history[1].copy_number, Some(1));

    assert!(services::borrowing_history(catalog.db(), 999)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_withdraw_and_reinstate_copy() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Fragile", "isbn-fragile", 1).await;
    let copy_id = catalog.index.copies_of_book(book_id).await.unwrap()[0]
        .id
        .unwrap();

    let withdrawn = services::withdraw_copy(catalog.db(), copy_id).await.unwrap();
    assert_eq!(withdrawn.status, CopyStatus::Withdrawn);
    assert!(services::available_books(catalog.db()).await.unwrap().is_empty());

    let reinstated = services::reinstate_copy(catalog.db(), copy_id).await.unwrap();
    assert_eq!(reinstated.status, CopyStatus::Available);

    // Only withdrawn copies can be reinstated
    let result = services::reinstate_copy(catalog.db(), copy_id).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));

    let result = services::withdraw_copy(catalog.db(), 999).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_lent_copy_blocks_book_and_copy_delete() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Busy", "isbn-busy", 1).await;
    let alice = register(&catalog, "Alice").await;

    let borrowing = services::lend_book(catalog.db(), lend(alice, book_id, date(6, 1)))
        .await
        .unwrap();

    let result = catalog.copies.delete(borrowing.copy_id).await;
    assert!(matches!(
        result,
        Err(DomainError::PreconditionViolation(Violation::CopyIsBorrowed { .. }))
    ));

    let result = catalog.books.delete(book_id).await;
    assert!(matches!(
        result,
        Err(DomainError::PreconditionViolation(Violation::BookHasCopies { copies: 1, .. }))
    ));
}

#[tokio::test]
async fn test_seed_demo_data_is_idempotent() {
    let catalog = setup_test_catalog().await;

    seed::seed_demo_data(&catalog).await.expect("Failed to seed");
    seed::seed_demo_data(&catalog).await.expect("Failed to re-seed");

    let snapshot = catalog.snapshot().await.unwrap();
    assert_eq!(snapshot.users.len(), 3);
    assert_eq!(snapshot.publishers.len(), 2);
    assert_eq!(snapshot.books.len(), 3);
    assert_eq!(snapshot.copies.len(), 4);
    assert_eq!(snapshot.borrowings.len(), 2);
    assert_eq!(snapshot.librarians.len(), 1);

    let open: Vec<_> = snapshot.borrowings.iter().filter(|b| b.is_open()).collect();
    assert_eq!(open.len(), 1);

    let borrowed = snapshot
        .copies
        .iter()
        .filter(|c| c.status == CopyStatus::Borrowed)
        .count();
    assert_eq!(borrowed, 1);

    // Every book still has something on the shelf
    assert_eq!(services::available_books(catalog.db()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_snapshot_serializes_to_json() {
    let catalog = setup_test_catalog().await;
    seed::seed_demo_data(&catalog).await.unwrap();

    let snapshot = catalog.snapshot().await.unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["books"].as_array().unwrap().len(), 3);
    assert_eq!(json["copies"][0]["status"], "Available");
    assert!(json["exported_at"].is_string());
}

#[tokio::test]
async fn test_add_book_with_too_many_copies_is_rejected() {
    let catalog = setup_test_catalog().await;

    let result = services::add_book_with_copies(
        catalog.db(),
        Book::new("Endless", "Nobody", 2000, "isbn-endless"),
        u32::MAX,
    )
    .await;

    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
    assert!(catalog.books.find_all().await.unwrap().is_empty());
    assert!(catalog.copies.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lend_skips_copy_with_open_borrowing_after_history_delete() {
    let catalog = setup_test_catalog().await;
    let book_id = catalogue(&catalog, "Relent", "isbn-relent", 2).await;
    let alice = register(&catalog, "Alice").await;
    let bob = register(&catalog, "Bob").await;
    let carol = register(&catalog, "Carol").await;

    let first = services::lend_book(catalog.db(), lend(alice, book_id, date(7, 1)))
        .await
        .unwrap();
    services::return_borrowing(catalog.db(), first.id.unwrap(), date(7, 5))
        .await
        .unwrap();
    let second = services::lend_book(catalog.db(), lend(bob, book_id, date(7, 6)))
        .await
        .unwrap();
    assert_eq!(second.copy_id, first.copy_id);

    // Dropping the old returned borrowing still resets the copy it pointed at
    catalog.borrowings.delete(first.id.unwrap()).await.unwrap();
    let relent = catalog
        .copies
        .find_by_id(first.copy_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(relent.status, CopyStatus::Available);
    assert_eq!(
        catalog.index.borrowing_of_copy(first.copy_id).await.unwrap(),
        Some(second.clone())
    );

    // The next loan goes to the copy that is really on the shelf
    let third = services::lend_book(catalog.db(), lend(carol, book_id, date(7, 7)))
        .await
        .unwrap();
    let copies = catalog.index.copies_of_book(book_id).await.unwrap();
    assert_eq!(third.copy_id, copies[1].id.unwrap());

    let result = services::lend_book(catalog.db(), lend(alice, book_id, date(7, 8))).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
    assert!(services::available_books(catalog.db()).await.unwrap().is_empty());
}
