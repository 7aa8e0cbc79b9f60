//! Typed HTTP client for the `/api` routes, built on [`reqwest`].

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::ClientError;
use crate::api::collection_cards::{CardRef, SetQuantityRequest};
use crate::api::collections::{CreateCollectionRequest, UpdateCollectionRequest};
use crate::api::sets::{CachedSetDto, IngestSetRequest, SetWithCardsDto};
use crate::auth::USER_HEADER;
use crate::domain::{Collection, CollectionCard, User};
use crate::services::{SearchParams, SearchResults, Stats};
use crate::tcg::{Card, Set};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    user_id: Option<i32>,
}

impl ApiClient {
    /// * `base_url` - Server root, e.g. `http://localhost:8000` (without `/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: None,
        }
    }

    /// Act as this user (`x-user-id`) instead of the server default
    pub fn with_user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/user")).await
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        self.send(self.request(Method::GET, "/collections")).await
    }

    pub async fn create_collection(
        &self,
        name: &str,
        language: Option<&str>,
    ) -> Result<Collection, ClientError> {
        let body = CreateCollectionRequest {
            name: name.to_string(),
            language: language.map(str::to_string),
        };
        self.send(self.request(Method::POST, "/collections").json(&body))
            .await
    }

    pub async fn update_collection(
        &self,
        id: i32,
        changes: &UpdateCollectionRequest,
    ) -> Result<Collection, ClientError> {
        let path = format!("/collections/{}", id);
        self.send(self.request(Method::PUT, &path).json(changes))
            .await
    }

    pub async fn delete_collection(&self, id: i32) -> Result<(), ClientError> {
        let path = format!("/collections/{}", id);
        let response = self.request(Method::DELETE, &path).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    /// Entries of one collection, or of every collection when `None`
    pub async fn list_collection_cards(
        &self,
        collection_id: Option<i32>,
    ) -> Result<Vec<CollectionCard>, ClientError> {
        let mut request = self.request(Method::GET, "/collection-cards");
        if let Some(collection_id) = collection_id {
            request = request.query(&[("collectionId", collection_id)]);
        }
        self.send(request).await
    }

    pub async fn add_collection_card(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<CollectionCard, ClientError> {
        let body = CardRef {
            collection_id,
            card_id: card_id.to_string(),
        };
        self.send(self.request(Method::POST, "/collection-cards").json(&body))
            .await
    }

    /// `None` once the last copy is gone
    pub async fn remove_collection_card(
        &self,
        collection_id: i32,
        card_id: &str,
    ) -> Result<Option<CollectionCard>, ClientError> {
        let query = CardRef {
            collection_id,
            card_id: card_id.to_string(),
        };
        self.send(self.request(Method::DELETE, "/collection-cards").query(&query))
            .await
    }

    pub async fn set_collection_card_quantity(
        &self,
        collection_id: i32,
        card_id: &str,
        quantity: i32,
    ) -> Result<Option<CollectionCard>, ClientError> {
        let body = SetQuantityRequest {
            collection_id,
            card_id: card_id.to_string(),
            quantity,
        };
        self.send(self.request(Method::PUT, "/collection-cards").json(&body))
            .await
    }

    pub async fn stats(&self) -> Result<Stats, ClientError> {
        self.send(self.request(Method::GET, "/stats")).await
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchResults, ClientError> {
        self.send(self.request(Method::GET, "/search").query(params))
            .await
    }

    pub async fn list_sets(&self) -> Result<Vec<CachedSetDto>, ClientError> {
        self.send(self.request(Method::GET, "/sets")).await
    }

    pub async fn get_set(&self, set_id: &str) -> Result<SetWithCardsDto, ClientError> {
        let path = format!("/sets/{}", set_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn ingest_set(&self, set: Set, cards: Vec<Card>) -> Result<CachedSetDto, ClientError> {
        let path = format!("/sets/{}", set.id);
        let body = IngestSetRequest { set, cards };
        self.send(self.request(Method::PUT, &path).json(&body))
            .await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let request = self.client.request(method, url);
        match self.user_id {
            Some(user_id) => request.header(USER_HEADER, user_id.to_string()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map non-2xx answers to [`ClientError::Status`], using the server's
    /// `{"error": ..}` message when the body carries one
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);

        tracing::warn!("API call failed with {}: {}", status, message);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
