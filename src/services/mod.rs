//! Services Layer
//!
//! Pure business logic over already-fetched rows, called by the HTTP handlers.

pub mod search_service;
pub mod stats_service;

pub use search_service::{SearchParams, SearchResults, search_cards};
pub use stats_service::{Stats, compute_stats};
