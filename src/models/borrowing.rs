use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DeleteTarget, DomainError, EntityKind};
use crate::infrastructure::record_store::Record;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrowings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub borrow_date: Date,
    /// NULL while the copy is still out on loan
    pub return_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::copy::Entity",
        from = "Column::CopyId",
        to = "super::copy::Column::Id"
    )]
    Copy,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO used by repositories and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: Option<i32>,
    pub user_id: i32,
    pub copy_id: i32,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Borrowing {
    /// An open borrowing starting on `borrow_date`
    pub fn open(user_id: i32, copy_id: i32, borrow_date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id,
            copy_id,
            borrow_date,
            return_date: None,
        }
    }

    /// The copy is still out on loan
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

impl From<Model> for Borrowing {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            user_id: model.user_id,
            copy_id: model.copy_id,
            borrow_date: model.borrow_date,
            return_date: model.return_date,
        }
    }
}

impl From<Borrowing> for ActiveModel {
    fn from(borrowing: Borrowing) -> Self {
        Self {
            id: borrowing.id.map_or(NotSet, Set),
            user_id: Set(borrowing.user_id),
            copy_id: Set(borrowing.copy_id),
            borrow_date: Set(borrowing.borrow_date),
            return_date: Set(borrowing.return_date),
        }
    }
}

impl Record for Borrowing {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    const KIND: EntityKind = EntityKind::Borrowing;

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
        DeleteTarget::Borrowing {
            id,
            copy_id: self.copy_id,
        }
    }
}
