use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Message returned to clients for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Search filter outside the allowed set of columns.
    #[error("Invalid filter parameter")]
    InvalidFilter,

    /// Category parameter that is not an integer.
    #[error("Invalid category parameter")]
    InvalidCategory,

    /// Create request without title, author or publication year.
    #[error("Missing required fields")]
    MissingFields,

    /// Delete request without a book id.
    #[error("Missing book ID")]
    MissingId,

    /// Book id that is not an integer.
    #[error("Invalid book ID")]
    InvalidId,

    /// Request body that could not be decoded.
    #[error("Invalid request body")]
    InvalidBody,

    /// No book with the given id.
    #[error("Book not found: {0}")]
    NotFound(i64),

    /// SQLite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    ///
    /// Only request validation failures are client errors. A missing row is
    /// reported as a store failure, same as any other database error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFilter
            | AppError::InvalidCategory
            | AppError::MissingFields
            | AppError::MissingId
            | AppError::InvalidId
            | AppError::InvalidBody => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a client.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, AppError>;
