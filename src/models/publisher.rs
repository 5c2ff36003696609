use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DeleteTarget, DomainError, EntityKind};
use crate::infrastructure::record_store::Record;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publishers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    pub contact: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: Option<i32>,
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Publisher {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: address.into(),
            contact: contact.into(),
        }
    }
}

impl From<Model> for Publisher {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            address: model.address,
            contact: model.contact,
        }
    }
}

impl From<Publisher> for ActiveModel {
    fn from(publisher: Publisher) -> Self {
        Self {
            id: publisher.id.map_or(NotSet, Set),
            name: Set(publisher.name),
            address: Set(publisher.address),
            contact: Set(publisher.contact),
        }
    }
}

impl Record for Publisher {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;

    const KIND: EntityKind = EntityKind::Publisher;

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
        DeleteTarget::Publisher { id }
    }
}
