use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{CopyStatus, DeleteTarget, DomainError, EntityKind};
use crate::infrastructure::record_store::Record;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "copies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    /// Unique within the owning book
    pub copy_number: i32,
    /// Availability status of this physical copy.
    /// Valid values:
    /// - `Available`: On shelf, can be lent
    /// - `Borrowed`: Currently lent to a user (has an open Borrowing)
    /// - `Withdrawn`: Out of circulation
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
    #[sea_orm(has_many = "super::borrowing::Entity")]
    Borrowings,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO used by repositories and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copy {
    pub id: Option<i32>,
    pub book_id: i32,
    pub copy_number: i32,
    pub status: CopyStatus,
}

impl Copy {
    pub fn new(book_id: i32, copy_number: i32, status: CopyStatus) -> Self {
        Self {
            id: None,
            book_id,
            copy_number,
            status,
        }
    }
}

impl TryFrom<Model> for Copy {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<CopyStatus>()
            .map_err(|e| DomainError::Database(format!("copy {}: {}", model.id, e)))?;

        Ok(Self {
            id: Some(model.id),
            book_id: model.book_id,
            copy_number: model.copy_number,
            status,
        })
    }
}

impl From<Copy> for ActiveModel {
    fn from(copy: Copy) -> Self {
        Self {
            id: copy.id.map_or(NotSet, Set),
            book_id: Set(copy.book_id),
            copy_number: Set(copy.copy_number),
            status: Set(copy.status.as_str().to_owned()),
        }
    }
}

impl Record for Copy {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    const KIND: EntityKind = EntityKind::Copy;

    fn id_column() -> Column {
        Column::Id
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn from_model(model: Model) -> Result<Self, DomainError> {
        Self::try_from(model)
    }

    fn into_active(self) -> ActiveModel {
        self.into()
    }

    fn delete_target(&self, id: i32) -> DeleteTarget {
        DeleteTarget::Copy {
            id,
            status: self.status,
        }
    }
}
