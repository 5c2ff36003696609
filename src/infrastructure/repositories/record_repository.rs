//! SeaORM implementation of Repository, shared by every entity kind

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::{DomainError, Repository};
use crate::infrastructure::record_store::{self, Record};
use crate::infrastructure::rule_engine;

/// SeaORM-based implementation of Repository for any [`Record`]
pub struct SeaOrmRepository<R> {
    db: DatabaseConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SeaOrmRepository<R> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for SeaOrmRepository<R> {
    async fn create(&self, entity: R) -> Result<R, DomainError> {
        let created = record_store::insert(&self.db, entity).await?;
        tracing::info!("Created {} {:?}", R::KIND, created.id());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<R>, DomainError> {
        record_store::find(&self.db, id).await
    }

    async fn find_all(&self) -> Result<Vec<R>, DomainError> {
        let records = record_store::scan(&self.db).await?;
        tracing::debug!("Loaded {} {} records", records.len(), R::KIND);
        Ok(records)
    }

    async fn update(&self, entity: R) -> Result<R, DomainError> {
        let id = entity.id();
        let updated = record_store::replace(&self.db, entity).await?;
        tracing::info!("Updated {} {:?}", R::KIND, id);
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        // Precondition, removal and cascades share one transaction; returning
        // early drops it, which rolls everything back.
        let txn = self.db.begin().await?;

        let Some(record) = record_store::find::<R, _>(&txn, id).await? else {
            tracing::debug!("Delete of missing {} {} ignored", R::KIND, id);
            txn.rollback().await?;
            return Ok(());
        };

        let target = record.delete_target(id);
        let cascades = rule_engine::enforce_delete(&txn, &target).await?;

        record_store::remove::<R, _>(&txn, id).await?;
        rule_engine::apply_cascades(&txn, &cascades).await?;

        txn.commit().await?;
        tracing::info!("Deleted {} {}", R::KIND, id);
        Ok(())
    }
}
