//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::tcg::{Card, Set};

/// User data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Collection data with calculated card counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
    /// Sum of quantities
    #[serde(default)]
    pub total_cards: i64,
    /// Number of distinct card ids
    #[serde(default)]
    pub unique_cards: i64,
}

/// Input for creating a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCollectionInput {
    pub name: String,
    pub language: Option<String>,
}

/// Input for updating a collection; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCollectionInput {
    pub name: Option<String>,
    pub language: Option<String>,
}

/// A (collection, card, quantity) membership record.
///
/// `id` and the timestamps are `None` for entries that only exist in a
/// client cache and have not been confirmed by the server yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCard {
    pub id: Option<i32>,
    pub collection_id: i32,
    pub card_id: String,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl CollectionCard {
    pub fn matches(&self, collection_id: i32, card_id: &str) -> bool {
        self.collection_id == collection_id && self.card_id == card_id
    }
}

/// A set held in the local catalog cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSet {
    pub set: Set,
    pub card_count: i32,
    pub last_updated: String,
}

impl CachedSet {
    /// A set is stale once `last_updated` is older than `ttl`.
    /// Unparseable timestamps count as stale.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match DateTime::parse_from_rfc3339(&self.last_updated) {
            Ok(updated) => now.signed_duration_since(updated.with_timezone(&Utc)) > ttl,
            Err(_) => true,
        }
    }
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Return the user with this username, creating it if missing
    async fn ensure(&self, username: &str) -> Result<User, DomainError>;
}

/// Repository trait for Collection entity. Every call is scoped to one owner.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// All collections of a user, oldest first
    async fn find_for_user(&self, user_id: i32) -> Result<Vec<Collection>, DomainError>;

    /// One collection, `None` when missing or owned by someone else
    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Collection>, DomainError>;

    async fn create(
        &self,
        user_id: i32,
        input: CreateCollectionInput,
    ) -> Result<Collection, DomainError>;

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: UpdateCollectionInput,
    ) -> Result<Collection, DomainError>;

    /// Delete a collection together with its entries
    async fn delete(&self, user_id: i32, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for CollectionCard entity.
///
/// Ownership of `collection_id` is checked by the caller.
#[async_trait]
pub trait CollectionCardRepository: Send + Sync {
    async fn find_by_collection(
        &self,
        collection_id: i32,
    ) -> Result<Vec<CollectionCard>, DomainError>;

    /// Entries across every collection of a user
    async fn find_for_user(&self, user_id: i32) -> Result<Vec<CollectionCard>, DomainError>;

    /// Increment or insert with quantity 1
    async fn add(&self, collection_id: i32, card_id: &str) -> Result<CollectionCard, DomainError>;

    /// Decrement or delete; `None` when the entry is gone afterwards or never existed
    async fn remove(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<Option<CollectionCard>, DomainError>;

    /// Store an exact quantity; zero or less deletes
    async fn set_quantity(
        &self,
        collection_id: i32,
        card_id: &str,
        quantity: i32,
    ) -> Result<Option<CollectionCard>, DomainError>;
}

/// Repository trait for the local card-catalog cache
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_sets(&self) -> Result<Vec<CachedSet>, DomainError>;

    async fn find_set(&self, set_id: &str) -> Result<Option<CachedSet>, DomainError>;

    /// Cached cards, optionally restricted to one set
    async fn find_cards(&self, set_id: Option<&str>) -> Result<Vec<Card>, DomainError>;

    /// Cached cards with these ids; unknown ids are skipped
    async fn find_cards_by_ids(&self, card_ids: &[String]) -> Result<Vec<Card>, DomainError>;

    /// Replace the cached copy of a set and its cards, stamping `last_updated`.
    /// Fails with `Validation` when a card id is already cached under another set.
    async fn upsert_set(&self, set: Set, cards: Vec<Card>) -> Result<CachedSet, DomainError>;
}
