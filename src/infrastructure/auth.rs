//! Stub "current user" hook.
//!
//! There is no session handling: a request may name its user with the
//! `x-user-id` header, otherwise the configured default user is served
//! (and created on first use).

use axum::{
    async_trait,
    extract::{FromRequestParts, Json},
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use crate::domain::User;
use crate::infrastructure::AppState;

pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }
}

type Rejection = (StatusCode, Json<serde_json::Value>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "error": message, "code": "UNAUTHORIZED" })))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Rejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_HEADER)
            .map(|h| h.to_str().map(str::trim));

        let lookup = match header {
            Some(Ok(raw)) => {
                let id: i32 = raw.parse().map_err(|_| {
                    reject(StatusCode::UNAUTHORIZED, "Invalid x-user-id header")
                })?;
                state.user_repo.find_by_id(id).await
            }
            Some(Err(_)) => {
                return Err(reject(StatusCode::UNAUTHORIZED, "Invalid x-user-id header"));
            }
            None => state
                .user_repo
                .ensure(&state.settings.default_username)
                .await
                .map(Some),
        };

        match lookup {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                tracing::warn!("Request for unknown user via {}", USER_HEADER);
                Err(reject(StatusCode::UNAUTHORIZED, "Unknown user"))
            }
            Err(e) => {
                tracing::error!("Failed to resolve current user: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An internal error occurred", "code": "INTERNAL_ERROR" })),
                ))
            }
        }
    }
}
