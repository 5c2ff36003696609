use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    tracing::debug!("Database ready at {}", database_url);

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

// References between tables are plain integer columns: no FOREIGN KEY clauses.
// Referential integrity is enforced by the consistency rules, not by SQLite.
async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS publishers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            contact TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            publisher TEXT,
            publication_year INTEGER NOT NULL,
            isbn TEXT NOT NULL UNIQUE,
            publisher_id INTEGER
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS copies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            copy_number INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'Available'
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            address TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS borrowings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            copy_id INTEGER NOT NULL,
            borrow_date TEXT NOT NULL,
            return_date TEXT
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS librarians (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            hire_date TEXT NOT NULL,
            position TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // Secondary indexes backing the relationship lookups
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_books_publisher_id ON books(publisher_id)",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_copies_book_number ON copies(book_id, copy_number)",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_borrowings_user_id ON borrowings(user_id)",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_borrowings_copy_id ON borrowings(copy_id)",
    )
    .await?;

    // A copy can be out on at most one open borrowing at a time
    execute(
        db,
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_borrowings_open_copy
        ON borrowings(copy_id) WHERE return_date IS NULL
        "#,
    )
    .await?;

    Ok(())
}
