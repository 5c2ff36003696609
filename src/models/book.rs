use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DeleteTarget, DomainError, EntityKind};
use crate::infrastructure::record_store::Record;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Publisher name as printed on the book (free text)
    pub publisher: Option<String>,
    pub publication_year: i32,
    #[sea_orm(unique)]
    pub isbn: String,
    /// Optional reference to a catalogued publisher
    pub publisher_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::copy::Entity")]
    Copies,
    #[sea_orm(
        belongs_to = "super::publisher::Entity",
        from = "Column::PublisherId",
        to = "super::publisher::Column::Id"
    )]
    Publisher,
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copies.def()
    }
}

impl Related<super::publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO used by repositories and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub publication_year: i32,
    pub isbn: String,
    pub publisher_id: Option<i32>,
}

impl Book {
    /// A not-yet-persisted book without a publisher reference
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            publisher: None,
            publication_year,
            isbn: isbn.into(),
            publisher_id: None,
        }
    }
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            author: model.author,
            publisher: model.publisher,
            publication_year: model.publication_year,
            isbn: model.isbn,
            publisher_id: model.publisher_id,
        }
    }
}

impl From<Book> for ActiveModel {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map_or(NotSet, Set),
            title: Set(book.title),
            author: Set(book.author),
            publisher: Set(book.publisher),
            publication_year: Set(book.publication_year),
            isbn: Set(book.isbn),
            publisher_id: Set(book.publisher_id),
        }
    }
}

impl Record for Book {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    const KIND: EntityKind = EntityKind::Book;

    fn id_column() -> Column {
        Column::Id
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn from_model(model: Model) -> Result<Self, DomainError> {
        Ok(Self::from(model))
    }

    fn into_active(self) -> ActiveModel {
        self.into()
    }

    fn delete_target(&self, id: i32) -> DeleteTarget {
        DeleteTarget::Book { id }
    }
}
