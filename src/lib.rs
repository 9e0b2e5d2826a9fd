//! book-catalog: a small book catalog web application.
//!
//! Books are stored in SQLite together with a fixed set of categories and
//! served through a JSON API and a handful of HTML pages.
//!
//! # Features
//!
//! - Search by title, author, publisher or ISBN, optionally within a category
//! - Paginated search results and book detail pages
//! - Add and delete books from the browser or the command line
//! - Cover images restricted to an allowlist of image hosts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Search, validation and id parsing rules.
pub mod catalog;
/// Configuration and CLI.
pub mod config;
/// Database operations.
pub mod db;
/// Error types.
pub mod error;
/// Result pagination.
pub mod pagination;
/// HTTP server.
pub mod server;

#[cfg(test)]
mod tests;

pub use config::{Cli, Command, Config};
pub use db::{BookStore, Database, MemoryStore};
pub use error::{AppError, Result};
pub use server::AppState;
