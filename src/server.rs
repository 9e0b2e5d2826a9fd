//! HTTP server and routes.

mod handlers;
pub mod pages;
mod params;
mod state;

pub use params::QueryParams;
pub use state::AppState;

use crate::error::INTERNAL_ERROR_MESSAGE;
use axum::{
    Router,
    body::Body,
    http::{Response, StatusCode, header},
    routing::get,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/books",
            get(handlers::list_books)
                .post(handlers::create_book)
                .delete(handlers::delete_book),
        )
        .route("/categories", get(handlers::list_categories));

    Router::new()
        .route("/", get(pages::index))
        .route("/search", get(pages::search))
        .route("/books/{id}", get(pages::book_detail))
        .route("/add-book", get(pages::add_book))
        .route("/del-book", get(pages::del_book))
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Turn a handler panic into the generic 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let body = serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }).to_string();

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from(INTERNAL_ERROR_MESSAGE)))
}
