//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{
    CatalogRepository, CollectionCardRepository, CollectionRepository, UserRepository,
};
use crate::infrastructure::{
    SeaOrmCatalogRepository, SeaOrmCollectionCardRepository, SeaOrmCollectionRepository,
    SeaOrmUserRepository,
};

/// Request-independent settings the handlers need
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// User served when a request carries no `x-user-id`
    pub default_username: String,
    /// Age after which a cached set is reported as stale
    pub set_cache_ttl_hours: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_username: crate::config::DEFAULT_USERNAME.to_string(),
            set_cache_ttl_hours: crate::config::DEFAULT_SET_CACHE_TTL_HOURS,
        }
    }
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_username: config.default_username.clone(),
            set_cache_ttl_hours: config.set_cache_ttl_hours,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub settings: Arc<AppSettings>,
    pub user_repo: Arc<dyn UserRepository>,
    pub collection_repo: Arc<dyn CollectionRepository>,
    pub collection_card_repo: Arc<dyn CollectionCardRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_settings(db, AppSettings::default())
    }

    pub fn with_settings(db: DatabaseConnection, settings: AppSettings) -> Self {
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let collection_repo = Arc::new(SeaOrmCollectionRepository::new(db.clone()));
        let collection_card_repo = Arc::new(SeaOrmCollectionCardRepository::new(db.clone()));
        let catalog_repo = Arc::new(SeaOrmCatalogRepository::new(db.clone()));

        Self {
            db,
            settings: Arc::new(settings),
            user_repo,
            collection_repo,
            collection_card_repo,
            catalog_repo,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
