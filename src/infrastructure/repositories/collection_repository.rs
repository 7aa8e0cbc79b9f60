//! SeaORM implementation of CollectionRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{
    Collection, CollectionRepository, CreateCollectionInput, DomainError, UpdateCollectionInput,
};
use crate::models::collection::{self, ActiveModel, Column, Entity as CollectionEntity};
use crate::models::collection_card::{self, Entity as CollectionCardEntity};

pub const DEFAULT_LANGUAGE: &str = "en";

/// SeaORM-based implementation of CollectionRepository
pub struct SeaOrmCollectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// (total quantity, unique cards) per collection id
    async fn card_counts(&self, ids: Vec<i32>) -> Result<HashMap<i32, (i64, i64)>, DomainError> {
        let mut counts = HashMap::new();
        if ids.is_empty() {
            return Ok(counts);
        }

        let entries = CollectionCardEntity::find()
            .filter(collection_card::Column::CollectionId.is_in(ids))
            .all(&self.db)
            .await?;

        for entry in entries {
            let slot = counts.entry(entry.collection_id).or_insert((0, 0));
            slot.0 += entry.quantity as i64;
            slot.1 += 1;
        }

        Ok(counts)
    }

    async fn find_owned_model(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<Option<collection::Model>, DomainError> {
        let model = CollectionEntity::find_by_id(id)
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model)
    }
}

fn to_collection(model: collection::Model, counts: (i64, i64)) -> Collection {
    Collection {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        language: model.language,
        created_at: model.created_at,
        updated_at: model.updated_at,
        total_cards: counts.0,
        unique_cards: counts.1,
    }
}

/// Trimmed, non-empty collection name
pub fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "collection name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_language(language: Option<String>) -> String {
    language
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

#[async_trait]
impl CollectionRepository for SeaOrmCollectionRepository {
    async fn find_for_user(&self, user_id: i32) -> Result<Vec<Collection>, DomainError> {
        let collections = CollectionEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        let counts = self
            .card_counts(collections.iter().map(|c| c.id).collect())
            .await?;

        Ok(collections
            .into_iter()
            .map(|col| {
                let c = counts.get(&col.id).copied().unwrap_or((0, 0));
                to_collection(col, c)
            })
            .collect())
    }

    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Collection>, DomainError> {
        match self.find_owned_model(user_id, id).await? {
            Some(col) => {
                let counts = self.card_counts(vec![col.id]).await?;
                let c = counts.get(&col.id).copied().unwrap_or((0, 0));
                Ok(Some(to_collection(col, c)))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        user_id: i32,
        input: CreateCollectionInput,
    ) -> Result<Collection, DomainError> {
        let name = validate_name(&input.name)?;
        let now = chrono::Utc::now().to_rfc3339();

        let new_collection = ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            language: Set(normalize_language(input.language)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_collection.insert(&self.db).await?;
        tracing::info!(
            "Created collection '{}' (id {}) for user {}",
            result.name,
            result.id,
            user_id
        );

        Ok(to_collection(result, (0, 0)))
    }

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: UpdateCollectionInput,
    ) -> Result<Collection, DomainError> {
        let existing = self
            .find_owned_model(user_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(validate_name(&name)?);
        }
        if input.language.is_some() {
            active.language = Set(normalize_language(input.language));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        let counts = self.card_counts(vec![model.id]).await?;
        let c = counts.get(&model.id).copied().unwrap_or((0, 0));
        Ok(to_collection(model, c))
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<(), DomainError> {
        if self.find_owned_model(user_id, id).await?.is_none() {
            return Err(DomainError::NotFound);
        }

        // Entries before the collection row
        let txn = self.db.begin().await?;
        CollectionCardEntity::delete_many()
            .filter(collection_card::Column::CollectionId.eq(id))
            .exec(&txn)
            .await?;
        let result = CollectionEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::info!("Deleted collection {} for user {}", id, user_id);
        Ok(())
    }
}
