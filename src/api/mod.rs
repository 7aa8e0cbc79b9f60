pub mod collection_cards;
pub mod collections;
pub mod error;
pub mod health;
pub mod search;
pub mod sets;
pub mod stats;
pub mod user;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Current user (stub hook)
        .route("/user", get(user::get_current_user))
        // Collections
        .route(
            "/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route(
            "/collections/:id",
            get(collections::get_collection)
                .put(collections::update_collection)
                .delete(collections::delete_collection),
        )
        // Membership
        .route(
            "/collection-cards",
            get(collection_cards::list_collection_cards)
                .post(collection_cards::add_collection_card)
                .put(collection_cards::set_collection_card_quantity)
                .delete(collection_cards::remove_collection_card),
        )
        // Stats & search
        .route("/stats", get(stats::get_stats))
        .route("/search", get(search::search))
        // Catalog cache
        .route("/sets", get(sets::list_sets))
        .route("/sets/:id", get(sets::get_set).put(sets::ingest_set))
        .with_state(state)
}
