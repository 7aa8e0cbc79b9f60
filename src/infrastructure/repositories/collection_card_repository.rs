//! SeaORM implementation of CollectionCardRepository
//!
//! Each mutation reads the current row and writes the new quantity inside
//! one transaction, going through `domain::membership` for the rule.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::domain::membership::{self, RemoveOutcome, SetOutcome};
use crate::domain::{CollectionCard, CollectionCardRepository, DomainError};
use crate::models::collection;
use crate::models::collection_card::{self, ActiveModel, Column, Entity as CollectionCardEntity};

pub struct SeaOrmCollectionCardRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollectionCardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<collection_card::Model> for CollectionCard {
    fn from(model: collection_card::Model) -> Self {
        Self {
            id: Some(model.id),
            collection_id: model.collection_id,
            card_id: model.card_id,
            quantity: model.quantity,
            added_at: Some(model.added_at),
            updated_at: Some(model.updated_at),
        }
    }
}

async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    collection_id: i32,
    card_id: &str,
) -> Result<Option<collection_card::Model>, DomainError> {
    let entry = CollectionCardEntity::find()
        .filter(Column::CollectionId.eq(collection_id))
        .filter(Column::CardId.eq(card_id))
        .one(conn)
        .await?;
    Ok(entry)
}

async fn store_quantity<C: ConnectionTrait>(
    conn: &C,
    existing: Option<collection_card::Model>,
    collection_id: i32,
    card_id: &str,
    quantity: i32,
) -> Result<collection_card::Model, DomainError> {
    let now = chrono::Utc::now().to_rfc3339();
    let model = match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.quantity = Set(quantity);
            active.updated_at = Set(now);
            active.update(conn).await?
        }
        None => {
            ActiveModel {
                collection_id: Set(collection_id),
                card_id: Set(card_id.to_string()),
                quantity: Set(quantity),
                added_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?
        }
    };
    Ok(model)
}

#[async_trait]
impl CollectionCardRepository for SeaOrmCollectionCardRepository {
    async fn find_by_collection(
        &self,
        collection_id: i32,
    ) -> Result<Vec<CollectionCard>, DomainError> {
        let entries = CollectionCardEntity::find()
            .filter(Column::CollectionId.eq(collection_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(entries.into_iter().map(CollectionCard::from).collect())
    }

    async fn find_for_user(&self, user_id: i32) -> Result<Vec<CollectionCard>, DomainError> {
        let entries = CollectionCardEntity::find()
            .join(JoinType::InnerJoin, collection_card::Relation::Collection.def())
            .filter(collection::Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(entries.into_iter().map(CollectionCard::from).collect())
    }

    async fn add(&self, collection_id: i32, card_id: &str) -> Result<CollectionCard, DomainError> {
        let txn = self.db.begin().await?;

        let existing = find_entry(&txn, collection_id, card_id).await?;
        let quantity = membership::quantity_after_add(existing.as_ref().map(|e| e.quantity))?;
        let model = store_quantity(&txn, existing, collection_id, card_id, quantity).await?;

        txn.commit().await?;
        tracing::debug!(
            "Collection {}: {} x{}",
            collection_id,
            model.card_id,
            model.quantity
        );
        Ok(model.into())
    }

    async fn remove(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<Option<CollectionCard>, DomainError> {
        let txn = self.db.begin().await?;

        let existing = find_entry(&txn, collection_id, card_id).await?;
        let result = match membership::remove_outcome(existing.as_ref().map(|e| e.quantity)) {
            RemoveOutcome::Missing => None,
            RemoveOutcome::Delete => {
                if let Some(model) = existing {
                    CollectionCardEntity::delete_by_id(model.id).exec(&txn).await?;
                }
                None
            }
            RemoveOutcome::Decrement(quantity) => {
                let model =
                    store_quantity(&txn, existing, collection_id, card_id, quantity).await?;
                Some(model.into())
            }
        };

        txn.commit().await?;
        Ok(result)
    }

    async fn set_quantity(
        &self,
        collection_id: i32,
        card_id: &str,
        quantity: i32,
    ) -> Result<Option<CollectionCard>, DomainError> {
        let txn = self.db.begin().await?;

        let existing = find_entry(&txn, collection_id, card_id).await?;
        let result = match membership::set_outcome(quantity) {
            SetOutcome::Store(quantity) => {
                let model =
                    store_quantity(&txn, existing, collection_id, card_id, quantity).await?;
                Some(model.into())
            }
            SetOutcome::Delete => {
                if let Some(model) = existing {
                    CollectionCardEntity::delete_by_id(model.id).exec(&txn).await?;
                }
                None
            }
        };

        txn.commit().await?;
        Ok(result)
    }
}
