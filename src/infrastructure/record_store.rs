//! Record store: keyed storage primitives shared by every entity kind
//!
//! Each function is generic over the SeaORM connection, so the same code runs
//! directly against the pool or inside a `DatabaseTransaction`.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
};

use crate::domain::{DeleteTarget, DomainError, EntityKind};

/// Mapping between a domain DTO and its SeaORM entity.
pub trait Record: Sized + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send;

    const KIND: EntityKind;

    /// Primary key column (integer, store-assigned)
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn id(&self) -> Option<i32>;

    fn from_model(model: Self::Model) -> Result<Self, DomainError>;

    /// Every attribute `Set`; the id is `NotSet` when the DTO has none
    fn into_active(self) -> Self::ActiveModel;

    /// Describe this record for the delete rules
    fn delete_target(&self, id: i32) -> DeleteTarget;
}

/// Insert a record under a new store-assigned id.
pub async fn insert<R, C>(conn: &C, record: R) -> Result<R, DomainError>
where
    R: Record,
    C: ConnectionTrait,
{
    let mut active = record.into_active();
    active.not_set(R::id_column());
    let model = active.insert(conn).await?;
    R::from_model(model)
}

/// Point lookup by id.
pub async fn find<R, C>(conn: &C, id: i32) -> Result<Option<R>, DomainError>
where
    R: Record,
    C: ConnectionTrait,
{
    R::Entity::find()
        .filter(R::id_column().eq(id))
        .one(conn)
        .await?
        .map(R::from_model)
        .transpose()
}

/// Full scan in insertion order.
pub async fn scan<R, C>(conn: &C) -> Result<Vec<R>, DomainError>
where
    R: Record,
    C: ConnectionTrait,
{
    R::Entity::find()
        .order_by_asc(R::id_column())
        .all(conn)
        .await?
        .into_iter()
        .map(R::from_model)
        .collect()
}

/// Replace every attribute of an existing record, keeping its id.
pub async fn replace<R, C>(conn: &C, record: R) -> Result<R, DomainError>
where
    R: Record,
    C: ConnectionTrait,
{
    let id = record.id().ok_or(DomainError::NotFound)?;

    if find::<R, C>(conn, id).await?.is_none() {
        return Err(DomainError::NotFound);
    }

    let model = record.into_active().update(conn).await?;
    R::from_model(model)
}

/// Physically delete a record. Returns whether a row was removed.
pub async fn remove<R, C>(conn: &C, id: i32) -> Result<bool, DomainError>
where
    R: Record,
    C: ConnectionTrait,
{
    let result = R::Entity::delete_many()
        .filter(R::id_column().eq(id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected > 0)
}
