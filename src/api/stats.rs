use std::collections::BTreeSet;

use axum::{Json, extract::State};

use super::error::ApiResult;
use crate::auth::CurrentUser;
use crate::infrastructure::AppState;
use crate::services::{Stats, compute_stats};

#[utoipa::path(
    get,
    path = "/api/stats",
    responses((status = 200, description = "Aggregate statistics over the user's collections"))
)]
pub async fn get_stats(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Json<Stats>> {
    let (collections, entries, sets) = futures::try_join!(
        state.collection_repo.find_for_user(user.id()),
        state.collection_card_repo.find_for_user(user.id()),
        state.catalog_repo.list_sets(),
    )?;

    let card_ids: Vec<String> = entries
        .iter()
        .map(|e| e.card_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let catalog = state.catalog_repo.find_cards_by_ids(&card_ids).await?;

    let stats = compute_stats(&collections, &entries, &catalog, &sets);
    tracing::debug!(
        "Stats for user {}: {} collections, {} cards",
        user.id(),
        stats.total_collections,
        stats.total_cards
    );
    Ok(Json(stats))
}
