use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use cardvault::config::Config;
use cardvault::db;
use cardvault::infrastructure::AppState;
use cardvault::infrastructure::state::AppSettings;
use cardvault::server;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        cors_allowed_origins: Vec::new(),
        default_username: "trainer".to_string(),
        set_cache_ttl_hours: 24,
        seed_demo: false,
    }
}

async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    (server::build_router(db.clone(), &test_config()), db)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    user_id: Option<i32>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        req = req.header("x-user-id", id.to_string());
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_collection(app: &Router, name: &str, user_id: Option<i32>) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/collections",
        Some(json!({ "name": name })),
        user_id,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

fn base_set_payload() -> Value {
    json!({
        "set": {
            "id": "base1",
            "name": "Base",
            "series": "Base",
            "printedTotal": 102,
            "total": 102,
            "releaseDate": "1999/01/09"
        },
        "cards": [
            { "id": "base1-4", "name": "Charizard", "supertype": "Pokémon", "types": ["Fire"], "rarity": "Rare Holo" },
            { "id": "base1-58", "name": "Pikachu", "supertype": "Pokémon", "types": ["Lightning"], "rarity": "Common" },
            { "id": "base1-46", "name": "Charmander", "supertype": "Pokémon", "types": ["Fire"], "rarity": "Common" },
            { "id": "base1-91", "name": "Bill", "supertype": "Trainer", "rarity": "Common" }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = setup_app().await;

    let (status, body) = call(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "cardvault");
}

#[tokio::test]
async fn test_default_user_is_created_on_first_request() {
    let (app, _db) = setup_app().await;

    let (status, first) = call(&app, Method::GET, "/api/user", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["username"], "trainer");

    assert!(first["updatedAt"].is_string());

    let (_, second) = call(&app, Method::GET, "/api/user", None, None).await;
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_concurrent_ensure_returns_one_user() {
    let state = AppState::new(setup_test_db().await);

    let (a, b) = futures::join!(state.user_repo.ensure("ash"), state.user_repo.ensure("ash"));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.id, b.id);
    assert_eq!(state.user_repo.ensure("ash").await.unwrap().id, a.id);
}

#[tokio::test]
async fn test_collection_crud() {
    let (app, _db) = setup_app().await;

    let id = create_collection(&app, "  Binder  ", None).await;

    let (status, body) = call(&app, Method::GET, &format!("/api/collections/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Binder");
    assert_eq!(body["language"], "en");
    assert_eq!(body["totalCards"], 0);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/collections/{}", id),
        Some(json!({ "name": "Trade binder", "language": "ja" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Trade binder");
    assert_eq!(body["language"], "ja");

    let (status, body) = call(&app, Method::GET, "/api/collections", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/collections/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &format!("/api/collections/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_and_remove_follow_quantity_rules() {
    let (app, _db) = setup_app().await;
    let cid = create_collection(&app, "Binder", None).await;
    let card = json!({ "collectionId": cid, "cardId": "base1-4" });

    let (status, body) = call(&app, Method::POST, "/api/collection-cards", Some(card.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 1);

    let (_, body) = call(&app, Method::POST, "/api/collection-cards", Some(card), None).await;
    assert_eq!(body["quantity"], 2);

    // Still one row per (collection, card)
    let (_, entries) = call(
        &app,
        Method::GET,
        &format!("/api/collection-cards?collectionId={}", cid),
        None,
        None,
    )
    .await;
    assert_eq!(entries.as_array().unwrap().len(), 1);

    let remove_uri = format!("/api/collection-cards?collectionId={}&cardId=base1-4", cid);
    let (status, body) = call(&app, Method::DELETE, &remove_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 1);

    let (_, body) = call(&app, Method::DELETE, &remove_uri, None, None).await;
    assert!(body.is_null());

    // Removing again is a no-op
    let (status, body) = call(&app, Method::DELETE, &remove_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (_, entries) = call(&app, Method::GET, "/api/collection-cards", None, None).await;
    assert!(entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_at_max_quantity_is_rejected() {
    let (app, _db) = setup_app().await;
    let cid = create_collection(&app, "Binder", None).await;

    let (_, body) = call(
        &app,
        Method::PUT,
        "/api/collection-cards",
        Some(json!({ "collectionId": cid, "cardId": "base1-4", "quantity": i32::MAX })),
        None,
    )
    .await;
    assert_eq!(body["quantity"], i32::MAX);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/collection-cards",
        Some(json!({ "collectionId": cid, "cardId": "base1-4" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, entries) = call(&app, Method::GET, "/api/collection-cards", None, None).await;
    assert_eq!(entries[0]["quantity"], i32::MAX);
}

#[tokio::test]
async fn test_set_quantity_zero_deletes_entry() {
    let (app, _db) = setup_app().await;
    let cid = create_collection(&app, "Binder", None).await;

    let (_, body) = call(
        &app,
        Method::PUT,
        "/api/collection-cards",
        Some(json!({ "collectionId": cid, "cardId": "base1-58", "quantity": 4 })),
        None,
    )
    .await;
    assert_eq!(body["quantity"], 4);

    let (_, body) = call(
        &app,
        Method::PUT,
        "/api/collection-cards",
        Some(json!({ "collectionId": cid, "cardId": "base1-58", "quantity": 0 })),
        None,
    )
    .await;
    assert!(body.is_null());

    let (_, collection) = call(&app, Method::GET, &format!("/api/collections/{}", cid), None, None).await;
    assert_eq!(collection["totalCards"], 0);
}

#[tokio::test]
async fn test_collections_are_isolated_between_users() {
    let (app, db) = setup_app().await;
    let misty = AppState::new(db).user_repo.ensure("misty").await.unwrap();

    let mine = create_collection(&app, "Mine", None).await;
    let hers = create_collection(&app, "Hers", Some(misty.id)).await;

    let (_, mine_list) = call(&app, Method::GET, "/api/collections", None, None).await;
    let names: Vec<&str> = mine_list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mine"]);

    let (status, _) = call(&app, Method::GET, &format!("/api/collections/{}", hers), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Cannot add to someone else's collection
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/collection-cards",
        Some(json!({ "collectionId": mine, "cardId": "base1-4" })),
        Some(misty.id),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/collections/{}", mine), None, Some(misty.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_collection_removes_its_cards() {
    let (app, _db) = setup_app().await;
    let keep = create_collection(&app, "Keep", None).await;
    let drop = create_collection(&app, "Drop", None).await;

    for cid in [keep, drop] {
        call(
            &app,
            Method::POST,
            "/api/collection-cards",
            Some(json!({ "collectionId": cid, "cardId": "base1-4" })),
            None,
        )
        .await;
    }

    call(&app, Method::DELETE, &format!("/api/collections/{}", drop), None, None).await;

    let (_, entries) = call(&app, Method::GET, "/api/collection-cards", None, None).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["collectionId"], keep);
}

#[tokio::test]
async fn test_set_ingest_and_listing() {
    let (app, _db) = setup_app().await;

    let (status, body) = call(&app, Method::PUT, "/api/sets/base1", Some(base_set_payload()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cardCount"], 4);
    assert_eq!(body["stale"], false);
    assert!(body["lastUpdated"].is_string());

    let (_, sets) = call(&app, Method::GET, "/api/sets", None, None).await;
    assert_eq!(sets.as_array().unwrap().len(), 1);
    assert_eq!(sets[0]["set"]["name"], "Base");

    let (status, set) = call(&app, Method::GET, "/api/sets/base1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["cards"].as_array().unwrap().len(), 4);

    // Re-ingesting replaces the cached cards
    let mut smaller = base_set_payload();
    smaller["cards"].as_array_mut().unwrap().truncate(2);
    let (_, body) = call(&app, Method::PUT, "/api/sets/base1", Some(smaller), None).await;
    assert_eq!(body["cardCount"], 2);
}

#[tokio::test]
async fn test_set_ingest_rejects_duplicate_and_foreign_card_ids() {
    let (app, _db) = setup_app().await;

    let mut duplicated = base_set_payload();
    let first = duplicated["cards"][0].clone();
    duplicated["cards"].as_array_mut().unwrap().push(first);
    let (status, body) = call(&app, Method::PUT, "/api/sets/base1", Some(duplicated), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("base1-4"));

    call(&app, Method::PUT, "/api/sets/base1", Some(base_set_payload()), None).await;

    let jungle = json!({
        "set": { "id": "base2", "name": "Jungle" },
        "cards": [
            { "id": "base2-1", "name": "Clefable" },
            { "id": "base1-58", "name": "Pikachu" }
        ]
    });
    let (status, body) = call(&app, Method::PUT, "/api/sets/base2", Some(jungle), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("base1"));

    // The rejected ingest left nothing behind
    let (status, _) = call(&app, Method::GET, "/api/sets/base2", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, base) = call(&app, Method::GET, "/api/sets/base1", None, None).await;
    assert_eq!(base["cards"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_huge_cache_ttl_does_not_break_set_listing() {
    let db = setup_test_db().await;
    let settings = AppSettings {
        set_cache_ttl_hours: 9_000_000_000_000,
        ..Default::default()
    };
    let app = cardvault::api::api_router(AppState::with_settings(db, settings));

    let (status, body) = call(&app, Method::PUT, "/sets/base1", Some(base_set_payload()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stale"], false);

    let (status, _) = call(&app, Method::GET, "/sets", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_stats_sum_quantities_and_group_rarities() {
    let (app, _db) = setup_app().await;
    call(&app, Method::PUT, "/api/sets/base1", Some(base_set_payload()), None).await;

    let binder = create_collection(&app, "Binder", None).await;
    let deck = create_collection(&app, "Deck", None).await;
    for (cid, card_id) in [
        (binder, "base1-4"),
        (binder, "base1-58"),
        (binder, "base1-58"),
        (deck, "base1-58"),
        (deck, "promo-1"),
    ] {
        call(
            &app,
            Method::POST,
            "/api/collection-cards",
            Some(json!({ "collectionId": cid, "cardId": card_id })),
            None,
        )
        .await;
    }

    let (status, stats) = call(&app, Method::GET, "/api/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalCollections"], 2);
    assert_eq!(stats["totalCards"], 5);
    assert_eq!(stats["uniqueCards"], 3);
    assert_eq!(stats["rarities"]["Common"], 3);
    assert_eq!(stats["rarities"]["Rare Holo"], 1);
    assert_eq!(stats["rarities"]["Unknown"], 1);

    let completion = stats["setCompletion"].as_array().unwrap();
    let base = completion.iter().find(|s| s["setId"] == "base1").unwrap();
    assert_eq!(base["owned"], 2);
    assert_eq!(base["total"], 102);
}

#[tokio::test]
async fn test_search_is_accent_insensitive_and_filtered() {
    let (app, _db) = setup_app().await;
    call(&app, Method::PUT, "/api/sets/base1", Some(base_set_payload()), None).await;

    let (status, body) = call(&app, Method::GET, "/api/search?q=char", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (_, body) = call(&app, Method::GET, "/api/search?supertype=pokemon&type=fire", None, None).await;
    let names: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Charizard"));
    assert!(names.contains(&"Charmander"));

    let (_, body) = call(&app, Method::GET, "/api/search?q=char&limit=1", None, None).await;
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);

    let (_, body) = call(&app, Method::GET, "/api/search", None, None).await;
    assert_eq!(body["total"], 0);

    // Set filter ignores case like the other filters
    let (_, body) = call(&app, Method::GET, "/api/search?q=char&set=BASE1", None, None).await;
    assert_eq!(body["total"], 2);
}
