use chrono::NaiveDate;

use crate::infrastructure::Catalog;
use crate::models::{Book, Librarian, Publisher, User};
use crate::services::{self, LendRequest, ServiceError};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ServiceError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ServiceError::InvalidState(format!("invalid date {year}-{month}-{day}")))
}

/// Populate an empty catalog with a small demo data set.
///
/// Does nothing when the catalog already holds books, so it is safe to run on
/// every start-up.
pub async fn seed_demo_data(catalog: &Catalog) -> Result<(), ServiceError> {
    if !catalog.books.find_all().await?.is_empty() {
        tracing::warn!("Catalog already has books, skipping demo data");
        return Ok(());
    }

    // 1. Users
    let vitalii = catalog
        .users
        .create(User::new("Vitalii", "vitalii@example.org", "575 422 555", "Zlote Terasy"))
        .await?;
    let artem = catalog
        .users
        .create(User::new("Artem", "artem@example.org", "095 911 40 26", "Apollo"))
        .await?;
    let slava = catalog
        .users
        .create(User::new("Slava", "slava@example.org", "050 058 04 55", "Dublin"))
        .await?;

    // 2. Publishers
    let penguin = catalog
        .publishers
        .create(Publisher::new("Penguin Books", "123 Book St", "123-456-789"))
        .await?;
    let harper = catalog
        .publishers
        .create(Publisher::new("HarperCollins", "456 Novel Ave", "987-654-321"))
        .await?;

    // 3. Books with their copies
    let books = [
        ("The Great Gatsby", "F. Scott Fitzgerald", 1925, "9780141182636", &penguin, 1),
        ("1984", "George Orwell", 1949, "9780141036144", &penguin, 1),
        ("To Kill a Mockingbird", "Harper Lee", 1960, "9780060935467", &harper, 2),
    ];

    let mut book_ids = Vec::with_capacity(books.len());
    for (title, author, year, isbn, publisher, copies) in books {
        let mut book = Book::new(title, author, year, isbn);
        book.publisher = Some(publisher.name.clone());
        book.publisher_id = publisher.id;

        let (book, _) = services::add_book_with_copies(catalog.db(), book, copies).await?;
        book_ids.push(book.id);
    }

    // 4. Borrowings: one already returned, one still open
    let (Some(gatsby), Some(mockingbird)) = (book_ids[0], book_ids[2]) else {
        return Err(ServiceError::NotFound("Seeded book".to_string()));
    };
    let (Some(vitalii_id), Some(artem_id), Some(slava_id)) = (vitalii.id, artem.id, slava.id)
    else {
        return Err(ServiceError::NotFound("Seeded user".to_string()));
    };

    let returned = services::lend_book(
        catalog.db(),
        LendRequest {
            user_id: vitalii_id,
            book_id: gatsby,
            borrow_date: date(2024, 1, 1)?,
        },
    )
    .await?;
    if let Some(id) = returned.id {
        services::return_borrowing(catalog.db(), id, date(2024, 1, 15)?).await?;
    }

    services::lend_book(
        catalog.db(),
        LendRequest {
            user_id: artem_id,
            book_id: mockingbird,
            borrow_date: date(2024, 1, 5)?,
        },
    )
    .await?;

    // 5. Librarian linked to an existing user
    catalog
        .librarians
        .create(Librarian {
            id: None,
            user_id: slava_id,
            hire_date: date(2023, 5, 10)?,
            position: "Senior Librarian".to_string(),
        })
        .await?;

    tracing::info!("Demo data seeded");
    Ok(())
}
