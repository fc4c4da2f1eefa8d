//! API regression tests.
//!
//! Drives the full router the daemon serves: partition reads and writes,
//! notice helpers, resets, and persistence across store reopen.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use codegear_api::build_router;
use codegear_content::*;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_router() -> Router {
    build_router(ContentStore::open_in_memory())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_responds() {
    let resp = test_router().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn fresh_store_serves_seed_content() {
    let resp = test_router().oneshot(get("/api/content")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["notices"].as_array().unwrap().len(), 6);
    assert_eq!(data["technologies"].as_array().unwrap().len(), 8);
    assert!(data["hero"].is_object());
    assert!(data["company"].is_object());
    assert!(data["social"].is_object());
}

#[tokio::test]
async fn type_param_is_accepted_as_partition() {
    let router = test_router();

    let by_partition = body_json(
        router
            .clone()
            .oneshot(get("/api/content?partition=technologies"))
            .await
            .unwrap(),
    )
    .await;
    let by_type = body_json(
        router
            .oneshot(get("/api/content?type=technologies"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(by_partition["data"], by_type["data"]);
    assert!(by_type["data"].is_array());
}

#[tokio::test]
async fn unknown_partition_is_rejected() {
    let router = test_router();

    let resp = router
        .clone()
        .oneshot(get("/api/content?partition=settings"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = router
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "settings", "data": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn singleton_write_merges_fields() {
    let router = test_router();

    let resp = router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "type": "hero", "data": { "mainCopy": "새로운 메인 카피" } }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "saved");

    let hero = body_json(
        router
            .oneshot(get("/api/content?partition=hero"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(hero["data"]["mainCopy"], "새로운 메인 카피");
    assert!(!hero["data"]["subCopy"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn collection_write_replaces_wholesale() {
    let router = test_router();

    let notices = json!([{
        "id": 42,
        "category": "공지",
        "title": "유일한 공지",
        "content": "나머지는 삭제되었습니다.",
        "date": "2026-10-01",
        "views": 9
    }]);
    let resp = router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "notices", "data": notices }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(
        router
            .oneshot(get("/api/content?partition=notices"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"], notices);
}

#[tokio::test]
async fn collection_write_requires_an_array() {
    let resp = test_router()
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "technologies", "data": { "id": "npu" } }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/content")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let resp = test_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["success"], false);
}

#[tokio::test]
async fn conflicting_query_params_get_the_envelope() {
    let resp = test_router()
        .oneshot(get("/api/content?partition=hero&type=social"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("partition"));
}

#[tokio::test]
async fn non_numeric_notice_id_gets_the_envelope() {
    let router = test_router();

    for req in [
        empty("DELETE", "/api/content/notices/abc"),
        empty("POST", "/api/content/notices/abc/views"),
        send_json("PATCH", "/api/content/notices/abc", json!({ "title": "x" })),
    ] {
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn notice_helpers_round_trip() {
    let router = test_router();

    let resp = router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/content/notices",
            json!({ "category": "채용", "title": "엔지니어 채용", "content": "지원을 기다립니다." }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["data"]["id"], 7);
    assert_eq!(created["data"]["views"], 0);

    let resp = router
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/api/content/notices/7",
            json!({ "title": "엔지니어 상시 채용" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    for _ in 0..3 {
        let resp = router
            .clone()
            .oneshot(empty("POST", "/api/content/notices/7/views"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let notices = body_json(
        router
            .clone()
            .oneshot(get("/api/content?partition=notices"))
            .await
            .unwrap(),
    )
    .await;
    let first = &notices["data"][0];
    assert_eq!(first["id"], 7);
    assert_eq!(first["title"], "엔지니어 상시 채용");
    assert_eq!(first["content"], "지원을 기다립니다.");
    assert_eq!(first["views"], 3);

    let resp = router
        .clone()
        .oneshot(empty("DELETE", "/api/content/notices/7"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router
        .oneshot(empty("POST", "/api/content/notices/7/views"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn strict_store_rejects_blank_title() {
    let store = ContentStore::open_in_memory().with_options(StoreOptions {
        strict_notices: true,
    });
    let resp = build_router(store)
        .oneshot(send_json(
            "POST",
            "/api/content/notices",
            json!({ "category": "공지", "title": "  ", "content": "본문" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_restores_defaults() {
    let router = test_router();

    router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "social", "data": { "github": "https://github.com/elsewhere" } }),
        ))
        .await
        .unwrap();

    let resp = router
        .clone()
        .oneshot(empty("DELETE", "/api/content?partition=social"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let social = body_json(
        router
            .oneshot(get("/api/content?partition=social"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(social["data"]["github"], "https://github.com/codegear");
}

#[tokio::test]
async fn writes_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admin-data.json");

    let resp = build_router(ContentStore::open(&path))
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "company", "data": { "email": "hello@codegear.example" } }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await.get("warning").is_none());

    let body = body_json(
        build_router(ContentStore::open(&path))
            .oneshot(get("/api/content?partition=company"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["email"], "hello@codegear.example");
}

#[tokio::test]
async fn unwritable_storage_warns_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let router = build_router(ContentStore::open(&blocker.join("admin-data.json")));
    let resp = router
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/content",
            json!({ "partition": "hero", "data": { "mainCopy": "메모리에만" } }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["warning"].is_string());

    let hero = body_json(
        router
            .oneshot(get("/api/content?partition=hero"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(hero["data"]["mainCopy"], "메모리에만");
}
