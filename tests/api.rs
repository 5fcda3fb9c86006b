//! Request-path tests for everything that must be decided before storage
//! is touched: whitelist gates, validation, id parsing, the docs helper.
//! The pool is lazy and never connects; any test that reached the database
//! would fail loudly, which is itself the property under test.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use metastats_api::{api_routes, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost/metastats_test")
        .expect("lazy pool");
    let state = AppState::new(pool).expect("consistent builtin registry and policy");
    axum::Router::new().nest("/api", api_routes(state))
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn reading_a_table_outside_the_whitelist_is_a_client_error() {
    let (status, body) = send(test_app(), get("/api/get/pg_catalog")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "read_not_allowed");
}

#[tokio::test]
async fn inserting_into_a_read_only_fact_table_is_forbidden() {
    // hero_win is ETL-owned; a syntactically perfect body must still be
    // rejected before any statement is built.
    let body = json!({"hero_id": 1, "win_rate": 50.5});
    let (status, resp) = send(test_app(), with_json("POST", "/api/insert/hero_win", &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["error"]["code"], "write_not_allowed");
}

#[tokio::test]
async fn deleting_from_a_read_only_fact_table_is_forbidden() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/delete/hero_rank_win/3")
        .body(Body::empty())
        .unwrap();
    let (status, resp) = send(test_app(), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["error"]["code"], "write_not_allowed");
}

#[tokio::test]
async fn validation_failures_report_every_field_problem_at_once() {
    let body = json!({"role_id": "not-a-number"});
    let (status, resp) = send(test_app(), with_json("POST", "/api/insert/hero", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["error"]["code"], "validation_error");
    let fields = resp["error"]["details"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    let named: Vec<&str> = fields.iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert!(named.contains(&"hero_name"));
    assert!(named.contains(&"role_id"));
}

#[tokio::test]
async fn update_body_with_no_known_fields_is_a_bad_request() {
    let body = json!({"nonsense": 1});
    let (status, resp) = send(test_app(), with_json("PUT", "/api/update/hero/1", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"]["code"], "bad_request");
}

#[tokio::test]
async fn update_body_with_a_bad_url_is_unprocessable() {
    let body = json!({"hero_icon_img_link": "definitely not a url"});
    let (status, resp) = send(test_app(), with_json("PUT", "/api/update/hero/1", &body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = resp["error"]["details"]["fields"].as_array().unwrap();
    assert_eq!(fields[0]["field"], "hero_icon_img_link");
    assert_eq!(fields[0]["kind"], "url");
}

#[tokio::test]
async fn non_numeric_item_ids_are_rejected_by_the_extractor() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/delete/hero/abc")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(test_app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn model_example_returns_a_sample_body_for_readable_tables() {
    let (status, body) = send(test_app(), get("/api/models/hero/example")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hero_name"], "Reinhardt");
    assert_eq!(body["role_id"], 1);
}

#[tokio::test]
async fn model_example_respects_the_readable_whitelist() {
    let (status, body) = send(test_app(), get("/api/models/pg_shadow/example")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "read_not_allowed");
}

#[tokio::test]
async fn model_example_is_case_insensitive_like_the_registry() {
    let (status, body) = send(test_app(), get("/api/models/GAME_MODE/example")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_mode_name"], "Hybrid");
}
