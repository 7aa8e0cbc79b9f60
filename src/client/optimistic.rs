//! Optimistic collection membership updates.
//!
//! The cached `CollectionCards` list is changed before the request goes
//! out, so the UI shows the new quantity immediately. After a successful
//! write a background refetch replaces the cached list with the server's
//! copy once the refresh delay has passed; a newer write pushes that
//! refetch back. On failure the cache is invalidated and the user gets an
//! error toast.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{ApiClient, ClientError, QueryCache, QueryKey, Toaster};
use crate::domain::CollectionCard;
use crate::domain::membership::{apply_add, apply_remove};

pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(2);

pub struct OptimisticCollectionCards {
    api: ApiClient,
    cache: Arc<QueryCache>,
    toaster: Arc<Toaster>,
    refresh_delay: Duration,
    pending_refetch: Mutex<Option<JoinHandle<()>>>,
}

impl OptimisticCollectionCards {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>, toaster: Arc<Toaster>) -> Self {
        Self {
            api,
            cache,
            toaster,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            pending_refetch: Mutex::new(None),
        }
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Add one copy of `card_id` to a collection
    pub async fn add_card(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<CollectionCard, ClientError> {
        let mut entries = self.cached_entries();
        if let Err(e) = apply_add(&mut entries, collection_id, card_id) {
            warn!("Not adding {} to collection {}: {}", card_id, collection_id, e);
            self.toaster.error("Cannot add more copies of this card");
            return Err(ClientError::Validation(e.to_string()));
        }
        self.cache.set(QueryKey::CollectionCards, entries);

        match self.api.add_collection_card(collection_id, card_id).await {
            Ok(entry) => {
                self.after_write().await;
                Ok(entry)
            }
            Err(e) => Err(self.report_failure("add card", e)),
        }
    }

    /// Remove one copy of `card_id`.
    ///
    /// An entry missing from the cache is a no-op: no request is sent and
    /// `Ok(None)` is returned.
    pub async fn remove_card(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<Option<CollectionCard>, ClientError> {
        let mut entries = self.cached_entries();
        if apply_remove(&mut entries, collection_id, card_id).is_none() {
            debug!("{} not in collection {}, nothing to remove", card_id, collection_id);
            return Ok(None);
        }
        self.cache.set(QueryKey::CollectionCards, entries);

        match self.api.remove_collection_card(collection_id, card_id).await {
            Ok(entry) => {
                self.after_write().await;
                Ok(entry)
            }
            Err(e) => Err(self.report_failure("remove card", e)),
        }
    }

    /// Wait for the scheduled refetch, if any, to finish
    pub async fn wait_for_refetch(&self) {
        let handle = self.pending_refetch.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn cached_entries(&self) -> Vec<CollectionCard> {
        self.cache
            .get::<Vec<CollectionCard>>(&QueryKey::CollectionCards)
            .unwrap_or_default()
    }

    async fn after_write(&self) {
        // Counts shown elsewhere are now out of date
        self.cache.invalidate(&QueryKey::Collections);
        self.cache.invalidate(&QueryKey::Stats);
        self.schedule_refetch().await;
    }

    async fn schedule_refetch(&self) {
        let mut pending = self.pending_refetch.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let api = self.api.clone();
        let cache = self.cache.clone();
        let delay = self.refresh_delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match api.list_collection_cards(None).await {
                Ok(entries) => cache.set(QueryKey::CollectionCards, entries),
                Err(e) => {
                    warn!("Background refetch of collection cards failed: {}", e);
                    cache.invalidate(&QueryKey::CollectionCards);
                }
            }
        }));
    }

    fn report_failure(&self, action: &str, e: ClientError) -> ClientError {
        error!("Failed to {}: {}", action, e);
        self.cache.invalidate_collection_queries();
        self.toaster.error(format!("Failed to {}", action));
        e
    }
}

impl Drop for OptimisticCollectionCards {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_refetch.get_mut().take() {
            handle.abort();
        }
    }
}
