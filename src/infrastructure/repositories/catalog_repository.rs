//! SeaORM implementation of CatalogRepository (the local card-catalog cache)

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{CachedSet, CatalogRepository, DomainError};
use crate::models::card_cache::{self, Entity as CardCacheEntity};
use crate::models::set_cache::{self, Entity as SetCacheEntity};
use crate::tcg::{Card, Set as TcgSet};

/// Rows per INSERT, keeps bound parameters well under SQLite's limit
const INSERT_CHUNK: usize = 100;

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_cached_set(model: set_cache::Model) -> Result<CachedSet, DomainError> {
    Ok(CachedSet {
        set: serde_json::from_str(&model.data)?,
        card_count: model.card_count,
        last_updated: model.last_updated,
    })
}

fn to_cards(models: Vec<card_cache::Model>) -> Result<Vec<Card>, DomainError> {
    models
        .into_iter()
        .map(|m| serde_json::from_str::<Card>(&m.data).map_err(DomainError::from))
        .collect()
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_sets(&self) -> Result<Vec<CachedSet>, DomainError> {
        let sets = SetCacheEntity::find()
            .order_by_asc(set_cache::Column::SetId)
            .all(&self.db)
            .await?;
        sets.into_iter().map(to_cached_set).collect()
    }

    async fn find_set(&self, set_id: &str) -> Result<Option<CachedSet>, DomainError> {
        match SetCacheEntity::find_by_id(set_id).one(&self.db).await? {
            Some(model) => Ok(Some(to_cached_set(model)?)),
            None => Ok(None),
        }
    }

    async fn find_cards(&self, set_id: Option<&str>) -> Result<Vec<Card>, DomainError> {
        let mut query = CardCacheEntity::find();
        if let Some(set_id) = set_id {
            query = query.filter(card_cache::Column::SetId.eq(set_id));
        }

        let cards = query
            .order_by_asc(card_cache::Column::SetId)
            .order_by_asc(card_cache::Column::CardId)
            .all(&self.db)
            .await?;
        to_cards(cards)
    }

    async fn find_cards_by_ids(&self, card_ids: &[String]) -> Result<Vec<Card>, DomainError> {
        if card_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::with_capacity(card_ids.len());
        for chunk in card_ids.chunks(INSERT_CHUNK) {
            let models = CardCacheEntity::find()
                .filter(card_cache::Column::CardId.is_in(chunk.iter().cloned()))
                .all(&self.db)
                .await?;
            cards.extend(to_cards(models)?);
        }
        Ok(cards)
    }

    async fn upsert_set(&self, set: TcgSet, cards: Vec<Card>) -> Result<CachedSet, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let set_id = set.id.clone();
        let card_count = cards.len() as i32;
        let card_ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();

        let mut rows = Vec::with_capacity(cards.len());
        for mut card in cards {
            if card.set.is_none() {
                card.set = Some(set.clone());
            }
            let types = if card.types.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&card.types)?)
            };
            rows.push(card_cache::ActiveModel {
                card_id: Set(card.id.clone()),
                set_id: Set(set_id.clone()),
                name: Set(card.name.clone()),
                supertype: Set(card.supertype.clone()),
                rarity: Set(card.rarity.clone()),
                types: Set(types),
                data: Set(serde_json::to_string(&card)?),
                last_updated: Set(now.clone()),
            });
        }

        let txn = self.db.begin().await?;

        // Card ids are unique across the whole cache
        for chunk in card_ids.chunks(INSERT_CHUNK) {
            let taken = CardCacheEntity::find()
                .filter(card_cache::Column::CardId.is_in(chunk.iter().cloned()))
                .filter(card_cache::Column::SetId.ne(set_id.as_str()))
                .one(&txn)
                .await?;
            if let Some(taken) = taken {
                txn.rollback().await?;
                return Err(DomainError::Validation(format!(
                    "card '{}' is already cached under set '{}'",
                    taken.card_id, taken.set_id
                )));
            }
        }

        CardCacheEntity::delete_many()
            .filter(card_cache::Column::SetId.eq(set_id.as_str()))
            .exec(&txn)
            .await?;
        SetCacheEntity::delete_by_id(set_id.as_str()).exec(&txn).await?;

        let model = set_cache::ActiveModel {
            set_id: Set(set_id.clone()),
            name: Set(set.name.clone()),
            data: Set(serde_json::to_string(&set)?),
            card_count: Set(card_count),
            last_updated: Set(now),
        }
        .insert(&txn)
        .await?;

        while !rows.is_empty() {
            let rest = rows.split_off(rows.len().min(INSERT_CHUNK));
            CardCacheEntity::insert_many(rows).exec(&txn).await?;
            rows = rest;
        }

        txn.commit().await?;
        tracing::info!("Cached set {} with {} cards", set_id, card_count);

        to_cached_set(model)
    }
}
