#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use book_catalog::{AppState, BookStore, Config, Database, MemoryStore, server};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build the router around a seeded in-memory store.
///
/// The store handle is returned so tests can inspect what the API wrote.
pub fn build_test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::seeded();
    let app = build_app_with(store.clone());
    (app, store)
}

/// Build the router around a seeded in-memory SQLite database.
pub fn build_sqlite_app() -> (Router, Database) {
    let db = Database::open_memory().unwrap();
    db.seed_categories().unwrap();
    let app = build_app_with(db.clone());
    (app, db)
}

/// Build the router around any store.
pub fn build_app_with(store: impl BookStore + 'static) -> Router {
    server::create_router(AppState::new(Config::default(), store))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
