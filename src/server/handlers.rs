//! JSON API handlers.

use crate::catalog::{self, BookQuery, CreateBookRequest};
use crate::db::{Book, BookWithCategory, Category};
use crate::error::{AppError, Result};
use crate::server::{AppState, QueryParams};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// List books matching a search.
pub async fn list_books(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<Vec<BookWithCategory>>> {
    let query = BookQuery::from_params(
        params.get("query"),
        params.get("category"),
        params.get("filter"),
    )?;

    let books = state.store.list_books(&query)?;
    tracing::debug!(
        filter = %query.filter,
        category = ?query.category_id,
        results = books.len(),
        "Listed books"
    );

    Ok(Json(books))
}

/// Create a book.
pub async fn create_book(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<Json<Book>> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected book body");
        AppError::InvalidBody
    })?;

    let new_book = req.into_new_book()?;
    let book = state.store.create_book(&new_book)?;
    tracing::info!(id = book.id, title = %book.title, "Book created");

    Ok(Json(book))
}

/// Delete a book.
pub async fn delete_book(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<Book>> {
    let id = catalog::parse_book_id(params.get("id"))?;
    let book = state.store.delete_book(id)?;
    tracing::info!(id = book.id, title = %book.title, "Book deleted");

    Ok(Json(book))
}

/// List categories.
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.store.list_categories()?))
}
