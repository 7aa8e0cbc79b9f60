use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cardvault::api;
use cardvault::db;
use cardvault::infrastructure::AppState;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

async fn setup_router() -> Router {
    api::api_router(setup_test_state().await)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_get_collection_not_found() {
    let app = setup_router().await;

    let req = Request::builder()
        .uri("/collections/999")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");

    // Update and delete of a non-existent collection
    let req = json_request("PUT", "/collections/999", r#"{"name": "Ghost"}"#);
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let req = Request::builder()
        .uri("/collections/999")
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_collection_with_blank_name() {
    let app = setup_router().await;

    let req = json_request("POST", "/collections", r#"{"name": "   "}"#);
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = setup_router().await;

    let req = json_request("POST", "/collections", r#"{"name": "#);
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_header_is_unauthorized() {
    let app = setup_router().await;

    for value in ["4242", "not-a-number"] {
        let req = Request::builder()
            .uri("/collections")
            .method("GET")
            .header("x-user-id", value)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_add_card_validation() {
    let state = setup_test_state().await;
    let user = state.user_repo.ensure("trainer").await.unwrap();
    let collection = state
        .collection_repo
        .create(
            user.id,
            cardvault::domain::CreateCollectionInput {
                name: "Binder".to_string(),
                language: None,
            },
        )
        .await
        .unwrap();
    let app = api::api_router(state);

    // Empty card id
    let payload = format!(r#"{{"collectionId": {}, "cardId": "  "}}"#, collection.id);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/collection-cards", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown collection
    let response = app
        .oneshot(json_request(
            "POST",
            "/collection-cards",
            r#"{"collectionId": 999, "cardId": "base1-4"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_ingest_rejects_mismatched_id() {
    let app = setup_router().await;

    let req = json_request(
        "PUT",
        "/sets/base1",
        r#"{"set": {"id": "base2", "name": "Jungle"}, "cards": []}"#,
    );
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let req = json_request(
        "PUT",
        "/sets/base1",
        r#"{"set": {"id": "base1", "name": "Base"}, "cards": [{"id": "", "name": "Nameless"}]}"#,
    );
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was cached
    let req = Request::builder()
        .uri("/sets/base1")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
