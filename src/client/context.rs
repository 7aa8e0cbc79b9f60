//! Shared collection list and "active collection" pointer

use std::sync::Arc;
use tracing::error;

use super::{ApiClient, ClientError, QueryCache, QueryKey, Toaster};
use crate::domain::Collection;

pub struct CollectionContext {
    api: ApiClient,
    cache: Arc<QueryCache>,
    toaster: Arc<Toaster>,
    collections: Vec<Collection>,
    active: Option<i32>,
}

impl CollectionContext {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>, toaster: Arc<Toaster>) -> Self {
        Self {
            api,
            cache,
            toaster,
            collections: Vec::new(),
            active: None,
        }
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn active_id(&self) -> Option<i32> {
        self.active
    }

    pub fn active_collection(&self) -> Option<&Collection> {
        let id = self.active?;
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn toaster(&self) -> &Arc<Toaster> {
        &self.toaster
    }

    /// Point at another collection; false when it is not in the list
    pub fn set_active(&mut self, id: Option<i32>) -> bool {
        match id {
            Some(id) if !self.collections.iter().any(|c| c.id == id) => false,
            _ => {
                self.active = id;
                true
            }
        }
    }

    /// Reload the list from the server. An active pointer to a collection
    /// that no longer exists is cleared.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let collections = self.api.list_collections().await?;
        self.cache.set(QueryKey::Collections, collections.clone());
        self.collections = collections;

        let active_exists = self
            .active
            .is_some_and(|id| self.collections.iter().any(|c| c.id == id));
        if !active_exists {
            self.active = None;
        }
        Ok(())
    }

    /// Create a collection and make it active when none is.
    ///
    /// Failures are returned without a toast; the caller reports them.
    pub async fn create_collection(
        &mut self,
        name: &str,
        language: Option<&str>,
    ) -> Result<Collection, ClientError> {
        let collection = self.api.create_collection(name, language).await?;

        self.collections.push(collection.clone());
        if self.active.is_none() {
            self.active = Some(collection.id);
        }
        self.cache.set(QueryKey::Collections, self.collections.clone());
        self.cache.invalidate(&QueryKey::Stats);
        Ok(collection)
    }

    pub async fn delete_collection(&mut self, id: i32) -> Result<(), ClientError> {
        if let Err(e) = self.api.delete_collection(id).await {
            error!("Failed to delete collection {}: {}", id, e);
            self.toaster.error("Failed to delete collection");
            return Err(e);
        }

        self.collections.retain(|c| c.id != id);
        if self.active == Some(id) {
            self.active = None;
        }
        self.cache.invalidate_collection_queries();
        self.cache.set(QueryKey::Collections, self.collections.clone());
        Ok(())
    }
}
