use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use video_catalog::routes::build_router;
use video_catalog::services::VideoDbManager;
use video_catalog::AppState;

fn fresh_state() -> Arc<AppState> {
    Arc::new(AppState::new(VideoDbManager::open_in_memory().unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, created) = send(app, post_json("/videos", body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    created
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = build_router(fresh_state());

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "service": "video-api" }));

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ready": true }));
}

#[tokio::test]
async fn test_unreachable_store_fails_ready_and_list() {
    let state = fresh_state();
    let poisoner = Arc::clone(&state);
    let _ = std::thread::spawn(move || {
        let _guard = poisoner.db_manager.lock().unwrap();
        panic!("simulated storage crash");
    })
    .join();

    let app = build_router(state);

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "ready": false }));

    let (status, body) = send(&app, get("/videos")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal Server Error");
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn test_empty_listing_uses_defaults() {
    let app = build_router(fresh_state());

    let (status, body) = send(&app, get("/videos")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["perPage"], 6);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["pages"], json!([1]));
    assert_eq!(body["hasPrev"], false);
    assert_eq!(body["hasNext"], false);
    assert!(body.get("prevPage").is_none());
    assert!(body.get("nextPage").is_none());
}

#[tokio::test]
async fn test_create_returns_snake_case_record() {
    let app = build_router(fresh_state());

    let created = create(
        &app,
        json!({
            "title": "Async Rust in practice",
            "tags": ["rust", "rust", "async"],
            "thumbnail_url": "https://cdn.example.com/async.webp",
            "duration": 600,
            "views": 12
        }),
    )
    .await;

    assert!(created["id"].as_str().map(|id| !id.is_empty()).unwrap_or(false));
    assert_eq!(created["title"], "Async Rust in practice");
    assert_eq!(created["thumbnail_url"], "https://cdn.example.com/async.webp");
    assert_eq!(created["duration"], 600);
    assert_eq!(created["views"], 12);
    assert_eq!(created["tags"], json!(["rust", "async"]));
    assert!(created["created_at"].is_string());

    let minimal = create(&app, json!({ "title": "Just a title" })).await;
    assert_eq!(minimal["duration"], 120);
    assert_eq!(minimal["views"], 0);
    assert_eq!(minimal["tags"], json!([]));
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let app = build_router(fresh_state());

    let cases = [
        json!({}),
        json!({ "title": "   " }),
        json!({ "title": "x", "thumbnail_url": "not-a-url" }),
        json!({ "title": "x", "duration": -1 }),
        json!({ "title": "x", "views": "many" }),
    ];
    for body in cases {
        let (status, response) = send(&app, post_json("/videos", body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, _) = send(&app, post_raw("/videos", "{ not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listing) = send(&app, get("/videos")).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn test_malformed_query_values_are_rejected() {
    let app = build_router(fresh_state());

    for uri in [
        "/videos?page=abc",
        "/videos?perPage=ten",
        "/videos?sort=sideways",
        "/videos?from=not-a-date",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"].is_array());
    }
}

#[tokio::test]
async fn test_filters_by_text_and_tag() {
    let app = build_router(fresh_state());
    create(&app, json!({ "title": "Sourdough basics", "tags": ["baking"] })).await;
    create(&app, json!({ "title": "Advanced SOURDOUGH", "tags": ["baking", "advanced"] })).await;
    create(&app, json!({ "title": "Knife skills", "tags": ["cooking"] })).await;

    let (_, body) = send(&app, get("/videos?q=sourdough")).await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(&app, get("/videos?tag=advanced")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Advanced SOURDOUGH");

    let (_, body) = send(&app, get("/videos?q=sourdough&tag=cooking")).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"], json!([]));

    let (_, body) = send(&app, get("/videos?from=2000-01-01&to=2999-12-31")).await;
    assert_eq!(body["total"], 3);

    let (_, body) = send(&app, get("/videos?to=2000-01-01")).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_pagination_is_clamped_and_bounded() {
    let app = build_router(fresh_state());
    for n in 0..13 {
        create(&app, json!({ "title": format!("Clip {}", n) })).await;
    }

    let (status, body) = send(&app, get("/videos?perPage=5&page=99")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 13);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["pages"], json!([1, 2, 3]));
    assert_eq!(body["hasNext"], false);
    assert_eq!(body["prevPage"], 2);

    let (_, body) = send(&app, get("/videos?perPage=5&page=0")).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["nextPage"], 2);

    let (_, body) = send(&app, get("/videos?perPage=500")).await;
    assert_eq!(body["perPage"], 100);
    assert_eq!(body["items"].as_array().unwrap().len(), 13);

    let mut seen = 0;
    for page in 1..=3 {
        let (_, body) = send(&app, get(&format!("/videos?perPage=5&page={}&sort=asc", page))).await;
        let items = body["items"].as_array().unwrap();
        assert!(items.len() <= 5);
        seen += items.len();
    }
    assert_eq!(seen, 13);
}
