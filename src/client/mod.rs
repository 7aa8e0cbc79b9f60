//! Client-side glue for the CardVault REST API
//!
//! This layer contains:
//! - Typed HTTP client (api_client)
//! - Query keys and the shared query cache (query_keys, query_cache)
//! - Optimistic collection membership updates (optimistic)
//! - Collection list / active collection state (context)
//! - The "new collection" dialog state (form)
//! - Transient notifications (toast)

pub mod api_client;
pub mod context;
pub mod form;
pub mod optimistic;
pub mod query_cache;
pub mod query_keys;
pub mod toast;

pub use api_client::ApiClient;
pub use context::CollectionContext;
pub use form::CreateCollectionForm;
pub use optimistic::OptimisticCollectionCards;
pub use query_cache::QueryCache;
pub use query_keys::QueryKey;
pub use toast::{Toast, ToastKind, Toaster};

use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    /// Transport failure or undecodable body
    Http(reqwest::Error),
    /// Server answered with a non-success status
    Status { status: u16, message: String },
    /// Rejected locally before any request was sent
    Validation(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP request failed: {}", e),
            ClientError::Status { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ClientError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}
