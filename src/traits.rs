use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect};

use crate::criteria::Criteria;
use crate::error::FilterError;
use crate::manager::QueryFilterManager;

/// Glue between a Sea-ORM entity and the criteria compiler.
///
/// Implementors name the metadata registry entry their entity was registered
/// under; the provided methods compile criteria through a
/// [`QueryFilterManager`] and execute the filtered select.
#[async_trait]
pub trait FilterableResource: Sized + Send + Sync
where
    Self: From<<Self::Entity as EntityTrait>::Model>,
    <Self::Entity as EntityTrait>::Model: Send + Sync,
{
    type Entity: EntityTrait + Sync;

    /// Name this entity is registered under in the metadata registry.
    const ENTITY: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Fetch a page of resources matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a criteria [`FilterError`] when compilation fails, or the
    /// wrapped database error when execution fails.
    async fn list(
        db: &DatabaseConnection,
        manager: &QueryFilterManager,
        criteria: &Criteria,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, FilterError> {
        let select = manager.apply(Self::Entity::find(), Self::ENTITY, criteria)?;
        let models = select.offset(offset).limit(limit).all(db).await?;
        Ok(models.into_iter().map(Self::from).collect())
    }

    /// Count all resources matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns a criteria [`FilterError`] when compilation fails, or the
    /// wrapped database error when execution fails.
    async fn total(
        db: &DatabaseConnection,
        manager: &QueryFilterManager,
        criteria: &Criteria,
    ) -> Result<u64, FilterError> {
        let select = manager.apply(Self::Entity::find(), Self::ENTITY, criteria)?;
        Ok(select.count(db).await?)
    }
}
