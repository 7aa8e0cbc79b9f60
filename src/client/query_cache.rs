//! In-process query cache shared by the client components.
//!
//! Values are stored type-erased per [`QueryKey`]; a `get` with the wrong
//! type behaves like a miss. Invalidation only flags an entry as stale,
//! the data stays readable until the next fetch replaces it.

use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

use super::QueryKey;

#[derive(Clone)]
struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    stale: bool,
}

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        entry.data.downcast_ref::<T>().cloned()
    }

    /// Store fresh data; clears the stale flag
    pub fn set<T: Send + Sync + 'static>(&self, key: QueryKey, data: T) {
        self.entries.insert(
            key,
            CacheEntry {
                data: Arc::new(data),
                stale: false,
            },
        );
    }

    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            debug!("Invalidating query {}", key);
            entry.stale = true;
        }
    }

    /// Collection cards, collections and stats
    pub fn invalidate_collection_queries(&self) {
        for key in &QueryKey::COLLECTION_QUERIES {
            self.invalidate(key);
        }
    }

    pub fn remove(&self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Missing entries count as stale
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_none_or(|entry| entry.stale)
    }
}
