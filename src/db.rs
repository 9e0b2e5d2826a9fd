mod memory;
mod schema;

pub use memory::MemoryStore;
pub use schema::Database;

use crate::catalog::BookQuery;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Subject area a book can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Stored book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Book ID, assigned by the store.
    pub id: i64,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Publisher.
    pub publisher: Option<String>,
    /// Year of publication.
    pub publication_year: i64,
    /// ISBN.
    pub isbn: Option<String>,
    /// Free-form keywords.
    pub keywords: Option<String>,
    /// Cover image URL.
    pub cover_image: Option<String>,
    /// Short description.
    pub summary: Option<String>,
    /// Category ID.
    pub category_id: Option<i64>,
}

/// Book joined with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithCategory {
    /// Book fields.
    #[serde(flatten)]
    pub book: Book,
    /// Category the book references, if any.
    pub category: Option<Category>,
}

/// Book fields supplied at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Publisher.
    pub publisher: Option<String>,
    /// Year of publication.
    pub publication_year: i64,
    /// ISBN.
    pub isbn: Option<String>,
    /// Free-form keywords.
    pub keywords: Option<String>,
    /// Cover image URL.
    pub cover_image: Option<String>,
    /// Short description.
    pub summary: Option<String>,
    /// Category ID.
    pub category_id: Option<i64>,
}

impl NewBook {
    /// Build the stored row once the store has assigned an id.
    pub fn with_id(&self, id: i64) -> Book {
        Book {
            id,
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            publication_year: self.publication_year,
            isbn: self.isbn.clone(),
            keywords: self.keywords.clone(),
            cover_image: self.cover_image.clone(),
            summary: self.summary.clone(),
            category_id: self.category_id,
        }
    }
}

/// Categories inserted into a fresh database, with their fixed ids.
pub const SEED_CATEGORIES: [(i64, &str); 9] = [
    (1, "law"),
    (2, "education"),
    (3, "politics"),
    (4, "computer science"),
    (5, "psychology"),
    (6, "general"),
    (7, "mathematics"),
    (8, "science"),
    (9, "social science"),
];

/// Book persistence.
///
/// Implemented by [`Database`] for SQLite and by [`MemoryStore`] for tests.
pub trait BookStore: Send + Sync {
    /// List books matching the query, each joined with its category.
    fn list_books(&self, query: &BookQuery) -> Result<Vec<BookWithCategory>>;

    /// Get a single book with its category.
    fn get_book(&self, id: i64) -> Result<Option<BookWithCategory>>;

    /// Insert a book and return the stored row.
    fn create_book(&self, book: &NewBook) -> Result<Book>;

    /// Delete a book and return the deleted row.
    ///
    /// Fails with [`crate::AppError::NotFound`] when no row matches.
    fn delete_book(&self, id: i64) -> Result<Book>;

    /// List all categories ordered by id.
    fn list_categories(&self) -> Result<Vec<Category>>;
}
