use axum::{
    Json,
    extract::{Query, State},
};

use super::error::ApiResult;
use crate::infrastructure::AppState;
use crate::services::{SearchParams, SearchResults, search_cards};

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses((status = 200, description = "Matching cards from the catalog cache"))
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResults>> {
    // Set filtering is case and accent insensitive, so it happens in search_cards
    let cards = state.catalog_repo.find_cards(None).await?;

    let results = search_cards(cards, &params);
    tracing::debug!("Search {:?} matched {} cards", params.q, results.total);
    Ok(Json(results))
}
