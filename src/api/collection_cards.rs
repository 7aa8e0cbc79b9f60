//! Collection membership endpoints (`/api/collection-cards`)

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::error::ApiResult;
use crate::auth::CurrentUser;
use crate::domain::{CollectionCard, DomainError};
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub collection_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CardRef {
    pub collection_id: i32,
    pub card_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityRequest {
    pub collection_id: i32,
    pub card_id: String,
    pub quantity: i32,
}

/// Fails with `NotFound` unless the collection belongs to the user
async fn ensure_owned(state: &AppState, user: &CurrentUser, collection_id: i32) -> ApiResult<()> {
    match state
        .collection_repo
        .find_by_id(user.id(), collection_id)
        .await?
    {
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound),
    }
}

fn validate_card_id(card_id: &str) -> ApiResult<&str> {
    let trimmed = card_id.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("cardId must not be empty".to_string()));
    }
    Ok(trimmed)
}

#[utoipa::path(
    get,
    path = "/api/collection-cards",
    params(ListQuery),
    responses(
        (status = 200, description = "Membership entries"),
        (status = 404, description = "Collection missing or owned by another user")
    )
)]
pub async fn list_collection_cards(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CollectionCard>>> {
    let entries = match query.collection_id {
        Some(collection_id) => {
            ensure_owned(&state, &user, collection_id).await?;
            state
                .collection_card_repo
                .find_by_collection(collection_id)
                .await?
        }
        None => state.collection_card_repo.find_for_user(user.id()).await?,
    };
    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/collection-cards",
    responses(
        (status = 200, description = "Entry after the add"),
        (status = 400, description = "Empty cardId"),
        (status = 404, description = "Collection missing or owned by another user")
    )
)]
pub async fn add_collection_card(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CardRef>,
) -> ApiResult<Json<CollectionCard>> {
    let card_id = validate_card_id(&payload.card_id)?;
    ensure_owned(&state, &user, payload.collection_id).await?;

    let entry = state
        .collection_card_repo
        .add(payload.collection_id, card_id)
        .await?;
    Ok(Json(entry))
}

#[utoipa::path(
    put,
    path = "/api/collection-cards",
    responses(
        (status = 200, description = "Stored entry, or null when the quantity removed it"),
        (status = 400, description = "Empty cardId"),
        (status = 404, description = "Collection missing or owned by another user")
    )
)]
pub async fn set_collection_card_quantity(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<SetQuantityRequest>,
) -> ApiResult<Json<Option<CollectionCard>>> {
    let card_id = validate_card_id(&payload.card_id)?;
    ensure_owned(&state, &user, payload.collection_id).await?;

    let entry = state
        .collection_card_repo
        .set_quantity(payload.collection_id, card_id, payload.quantity)
        .await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/collection-cards",
    params(CardRef),
    responses(
        (status = 200, description = "Entry after the remove, or null when gone or never present"),
        (status = 404, description = "Collection missing or owned by another user")
    )
)]
pub async fn remove_collection_card(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<CardRef>,
) -> ApiResult<Json<Option<CollectionCard>>> {
    let card_id = validate_card_id(&query.card_id)?;
    ensure_owned(&state, &user, query.collection_id).await?;

    let entry = state
        .collection_card_repo
        .remove(query.collection_id, card_id)
        .await?;
    Ok(Json(entry))
}
