use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema, Statement,
};

use crate::models::{card_cache, collection, collection_card, set_cache, user};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    run_migrations(&db).await?;

    Ok(db)
}

/// Create every table and index that does not exist yet.
///
/// Tables come from the entity definitions so the same code serves SQLite
/// and Postgres. Safe to run on every start.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    tracing::debug!("Running migrations on {:?}", backend);

    // Parents before children for the foreign keys
    create_table(db, user::Entity).await?;
    create_table(db, collection::Entity).await?;
    create_table(db, collection_card::Entity).await?;
    create_table(db, set_cache::Entity).await?;
    create_table(db, card_cache::Entity).await?;

    create_index(
        db,
        Index::create()
            .name("idx_collection_cards_membership")
            .table(collection_card::Entity)
            .col(collection_card::Column::CollectionId)
            .col(collection_card::Column::CardId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("idx_collections_user")
            .table(collection::Entity)
            .col(collection::Column::UserId)
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("idx_card_cache_set")
            .table(card_cache::Entity)
            .col(card_cache::Column::SetId)
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, stmt: IndexCreateStatement) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Cheap connectivity probe used by the health endpoint
pub async fn ping(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "SELECT 1".to_owned()))
        .await?;
    Ok(())
}
