use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use crate::auth::CurrentUser;
use crate::domain::{Collection, CreateCollectionInput, DomainError, UpdateCollectionInput};
use crate::infrastructure::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCollectionRequest {
    pub name: Option<String>,
    pub language: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/collections",
    responses((status = 200, description = "Collections of the current user"))
)]
pub async fn list_collections(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Collection>>> {
    let collections = state.collection_repo.find_for_user(user.id()).await?;
    Ok(Json(collections))
}

#[utoipa::path(
    post,
    path = "/api/collections",
    responses(
        (status = 201, description = "Collection created"),
        (status = 400, description = "Empty name")
    )
)]
pub async fn create_collection(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateCollectionRequest>,
) -> ApiResult<(StatusCode, Json<Collection>)> {
    let collection = state
        .collection_repo
        .create(
            user.id(),
            CreateCollectionInput {
                name: payload.name,
                language: payload.language,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

#[utoipa::path(
    get,
    path = "/api/collections/{id}",
    params(("id" = i32, Path, description = "Collection id")),
    responses(
        (status = 200, description = "The collection"),
        (status = 404, description = "Missing or owned by another user")
    )
)]
pub async fn get_collection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Collection>> {
    state
        .collection_repo
        .find_by_id(user.id(), id)
        .await?
        .map(Json)
        .ok_or(DomainError::NotFound)
}

#[utoipa::path(
    put,
    path = "/api/collections/{id}",
    params(("id" = i32, Path, description = "Collection id")),
    responses(
        (status = 200, description = "Collection updated"),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Missing or owned by another user")
    )
)]
pub async fn update_collection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCollectionRequest>,
) -> ApiResult<Json<Collection>> {
    let collection = state
        .collection_repo
        .update(
            user.id(),
            id,
            UpdateCollectionInput {
                name: payload.name,
                language: payload.language,
            },
        )
        .await?;
    Ok(Json(collection))
}

#[utoipa::path(
    delete,
    path = "/api/collections/{id}",
    params(("id" = i32, Path, description = "Collection id")),
    responses(
        (status = 204, description = "Collection and its cards deleted"),
        (status = 404, description = "Missing or owned by another user")
    )
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.collection_repo.delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
