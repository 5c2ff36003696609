use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DeleteTarget, DomainError, EntityKind};
use crate::infrastructure::record_store::Record;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "librarians")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub hire_date: Date,
    pub position: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Librarian {
    pub id: Option<i32>,
    pub user_id: i32,
    pub hire_date: NaiveDate,
    pub position: String,
}

impl From<Model> for Librarian {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            user_id: model.user_id,
            hire_date: model.hire_date,
            position: model.position,
        }
    }
}

impl From<Librarian> for ActiveModel {
    fn from(librarian: Librarian) -> Self {
        Self {
            id: librarian.id.map_or(NotSet, Set),
            user_id: Set(librarian.user_id),
            hire_date: Set(librarian.hire_date),
            position: Set(librarian.position),
        }
    }
}

impl Record for Librarian {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    const KIND: EntityKind = EntityKind::Librarian;

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
        DeleteTarget::Librarian { id }
    }
}
