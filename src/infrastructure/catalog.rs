//! Catalog handle containing the connection and every repository

use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{DomainError, RelationshipIndex, Repository};
use crate::infrastructure::db;
use crate::infrastructure::{SeaOrmRelationshipIndex, SeaOrmRepository};
use crate::models::{Book, Borrowing, Copy, Librarian, Publisher, User};

/// Explicitly opened store handle shared by every caller
#[derive(Clone)]
pub struct Catalog {
    /// Database connection (services run their own transactions on it)
    db: DatabaseConnection,
    pub books: Arc<dyn Repository<Book>>,
    pub copies: Arc<dyn Repository<Copy>>,
    pub publishers: Arc<dyn Repository<Publisher>>,
    pub users: Arc<dyn Repository<User>>,
    pub borrowings: Arc<dyn Repository<Borrowing>>,
    pub librarians: Arc<dyn Repository<Librarian>>,
    /// Reverse lookups between records
    pub index: Arc<dyn RelationshipIndex>,
}

/// Every record of every kind, for export
#[derive(Debug, Serialize)]
pub struct CatalogSnapshot {
    pub exported_at: String,
    pub publishers: Vec<Publisher>,
    pub books: Vec<Book>,
    pub copies: Vec<Copy>,
    pub users: Vec<User>,
    pub borrowings: Vec<Borrowing>,
    pub librarians: Vec<Librarian>,
}

impl Catalog {
    /// Connect to `database_url`, create the schema if needed and build the repositories
    pub async fn open(database_url: &str) -> Result<Self, DomainError> {
        let db = db::init_db(database_url).await?;
        tracing::info!("Catalog opened");
        Ok(Self::new(db))
    }

    /// Create a Catalog over an already initialised connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            books: Arc::new(SeaOrmRepository::<Book>::new(db.clone())),
            copies: Arc::new(SeaOrmRepository::<Copy>::new(db.clone())),
            publishers: Arc::new(SeaOrmRepository::<Publisher>::new(db.clone())),
            users: Arc::new(SeaOrmRepository::<User>::new(db.clone())),
            borrowings: Arc::new(SeaOrmRepository::<Borrowing>::new(db.clone())),
            librarians: Arc::new(SeaOrmRepository::<Librarian>::new(db.clone())),
            index: Arc::new(SeaOrmRelationshipIndex::new(db.clone())),
            db,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the underlying connection pool
    pub async fn close(self) -> Result<(), DomainError> {
        self.db.close().await?;
        tracing::info!("Catalog closed");
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<CatalogSnapshot, DomainError> {
        Ok(CatalogSnapshot {
            exported_at: chrono::Utc::now().to_rfc3339(),
            publishers: self.publishers.find_all().await?,
            books: self.books.find_all().await?,
            copies: self.copies.find_all().await?,
            users: self.users.find_all().await?,
            borrowings: self.borrowings.find_all().await?,
            librarians: self.librarians.find_all().await?,
        })
    }
}
