//! Card-set catalog cache endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::ApiResult;
use crate::domain::{CachedSet, DomainError};
use crate::config::DEFAULT_SET_CACHE_TTL_HOURS;
use crate::infrastructure::AppState;
use crate::tcg::{Card, Set};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSetDto {
    #[serde(flatten)]
    pub cached: CachedSet,
    pub stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWithCardsDto {
    #[serde(flatten)]
    pub cached: CachedSetDto,
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestSetRequest {
    pub set: Set,
    #[serde(default)]
    pub cards: Vec<Card>,
}

fn with_staleness(state: &AppState, cached: CachedSet) -> CachedSetDto {
    let ttl = Duration::try_hours(state.settings.set_cache_ttl_hours)
        .unwrap_or_else(|| Duration::hours(DEFAULT_SET_CACHE_TTL_HOURS));
    let stale = cached.is_stale(Utc::now(), ttl);
    CachedSetDto { cached, stale }
}

#[utoipa::path(
    get,
    path = "/api/sets",
    responses((status = 200, description = "Cached sets with lastUpdated and staleness"))
)]
pub async fn list_sets(State(state): State<AppState>) -> ApiResult<Json<Vec<CachedSetDto>>> {
    let sets = state.catalog_repo.list_sets().await?;
    Ok(Json(
        sets.into_iter()
            .map(|s| with_staleness(&state, s))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/sets/{id}",
    params(("id" = String, Path, description = "Set id")),
    responses(
        (status = 200, description = "Cached set with its cards"),
        (status = 404, description = "Set not cached")
    )
)]
pub async fn get_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SetWithCardsDto>> {
    let cached = state
        .catalog_repo
        .find_set(&id)
        .await?
        .ok_or(DomainError::NotFound)?;
    let cards = state.catalog_repo.find_cards(Some(&id)).await?;

    Ok(Json(SetWithCardsDto {
        cached: with_staleness(&state, cached),
        cards,
    }))
}

#[utoipa::path(
    put,
    path = "/api/sets/{id}",
    params(("id" = String, Path, description = "Set id")),
    responses(
        (status = 200, description = "Set cached, lastUpdated refreshed"),
        (status = 400, description = "Set id mismatch, card without id, duplicate card id or card cached under another set")
    )
)]
pub async fn ingest_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<IngestSetRequest>,
) -> ApiResult<Json<CachedSetDto>> {
    if payload.set.id.trim().is_empty() || payload.set.id != id {
        return Err(DomainError::Validation(format!(
            "set id '{}' does not match path '{}'",
            payload.set.id, id
        )));
    }
    if payload.cards.iter().any(|c| c.id.trim().is_empty()) {
        return Err(DomainError::Validation(
            "every card needs an id".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(payload.cards.len());
    if let Some(dup) = payload.cards.iter().find(|c| !seen.insert(c.id.as_str())) {
        return Err(DomainError::Validation(format!(
            "card '{}' appears more than once",
            dup.id
        )));
    }

    let cached = state
        .catalog_repo
        .upsert_set(payload.set, payload.cards)
        .await?;
    Ok(Json(with_staleness(&state, cached)))
}
