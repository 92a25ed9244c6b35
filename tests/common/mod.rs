#![allow(dead_code)]

use filtercrate::{AssociationDef, EntityMetadata, MetadataRegistry, QueryFilterManager};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, EntityTrait, QueryTrait, Schema, Select};

pub mod account_entity;
pub mod order_entity;

/// Manager over the test entities: accounts with an `orders` association,
/// orders with the reverse `account` association.
pub fn manager() -> QueryFilterManager {
    let registry = MetadataRegistry::default()
        .with_entity(
            EntityMetadata::from_entity::<account_entity::Entity>("account")
                .with_association(AssociationDef::new("orders", "order", "id", "account_id")),
        )
        .with_entity(
            EntityMetadata::from_entity::<order_entity::Entity>("order")
                .with_association(AssociationDef::new("account", "account", "account_id", "id")),
        );
    QueryFilterManager::new(registry)
}

/// Render a select to its SQLite SQL, values inlined.
pub fn sql<E: EntityTrait>(select: &Select<E>) -> String {
    select.build(DbBackend::Sqlite).to_string()
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema = Schema::new(DbBackend::Sqlite);
    let backend = db.get_database_backend();
    db.execute(backend.build(&schema.create_table_from_entity(account_entity::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(order_entity::Entity)))
        .await?;
    Ok(db)
}
