use crate::catalog::BookQuery;
use crate::db::*;
use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Arc;

/// Columns selected for a book joined with its category.
const BOOK_COLUMNS: &str = "b.id, b.title, b.author, b.publisher, b.publication_year, b.isbn,
     b.keywords, b.cover_image, b.summary, b.category_id, c.id, c.name";

/// Columns returned by `INSERT` and `DELETE`.
const RETURNING_COLUMNS: &str = "id, title, author, publisher, publication_year, isbn,
     keywords, cover_image, summary, category_id";

/// Database wrapper for thread-safe access.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Internal(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Open in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Internal(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- Categories table
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            -- Books table
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                publisher TEXT,
                publication_year INTEGER NOT NULL,
                isbn TEXT,
                keywords TEXT,
                cover_image TEXT,
                summary TEXT,
                category_id INTEGER,
                FOREIGN KEY (category_id) REFERENCES categories(id)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id);
            "#,
        )
        .map_err(|e| AppError::Internal(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    // ========== CATEGORY OPERATIONS ==========

    /// Insert the seed categories that are not present yet.
    ///
    /// Returns the number of rows inserted.
    pub fn seed_categories(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let mut inserted = 0;

        for (id, name) in SEED_CATEGORIES {
            inserted += conn
                .execute(
                    "INSERT OR IGNORE INTO categories (id, name) VALUES (?1, ?2)",
                    params![id, name],
                )
                .map_err(|e| AppError::Internal(format!("Failed to seed categories: {}", e)))?;
        }

        Ok(inserted)
    }

    /// Count stored books.
    pub fn book_count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|e| AppError::Internal(format!("Failed to count books: {}", e)))
    }
}

impl BookStore for Database {
    fn list_books(&self, query: &BookQuery) -> Result<Vec<BookWithCategory>> {
        let conn = self.conn.lock();

        // The column comes from a closed enum, never from user input.
        let mut sql = format!(
            "SELECT {BOOK_COLUMNS}
             FROM books b
             LEFT JOIN categories c ON c.id = b.category_id
             WHERE b.{} LIKE ?1 ESCAPE '\\'",
            query.filter.column()
        );
        if query.category_id.is_some() {
            sql.push_str(" AND b.category_id = ?2");
        }
        sql.push_str(" ORDER BY b.id");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let pattern = like_pattern(&query.text);
        let rows = match query.category_id {
            Some(category_id) => stmt.query_map(params![pattern, category_id], joined_from_row),
            None => stmt.query_map(params![pattern], joined_from_row),
        };

        let books = rows
            .map_err(|e| AppError::Internal(format!("Failed to list books: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect books: {}", e)))?;

        Ok(books)
    }

    fn get_book(&self, id: i64) -> Result<Option<BookWithCategory>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "SELECT {BOOK_COLUMNS}
                 FROM books b
                 LEFT JOIN categories c ON c.id = b.category_id
                 WHERE b.id = ?1"
            ),
            params![id],
            joined_from_row,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get book: {}", e)))
    }

    fn create_book(&self, book: &NewBook) -> Result<Book> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "INSERT INTO books
                 (title, author, publisher, publication_year, isbn, keywords, cover_image, summary, category_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING {RETURNING_COLUMNS}"
            ),
            params![
                book.title,
                book.author,
                book.publisher,
                book.publication_year,
                book.isbn,
                book.keywords,
                book.cover_image,
                book.summary,
                book.category_id,
            ],
            |row| book_from_row(row, 0),
        )
        .map_err(|e| AppError::Internal(format!("Failed to create book: {}", e)))
    }

    fn delete_book(&self, id: i64) -> Result<Book> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("DELETE FROM books WHERE id = ?1 RETURNING {RETURNING_COLUMNS}"),
            params![id],
            |row| book_from_row(row, 0),
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to delete book: {}", e)))?
        .ok_or(AppError::NotFound(id))
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, name FROM categories ORDER BY id")
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| AppError::Internal(format!("Failed to list categories: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect categories: {}", e)))?;

        Ok(categories)
    }
}

/// `LIKE` pattern for a literal substring.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Read book columns starting at `offset`.
fn book_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(offset)?,
        title: row.get(offset + 1)?,
        author: row.get(offset + 2)?,
        publisher: row.get(offset + 3)?,
        publication_year: row.get(offset + 4)?,
        isbn: row.get(offset + 5)?,
        keywords: row.get(offset + 6)?,
        cover_image: row.get(offset + 7)?,
        summary: row.get(offset + 8)?,
        category_id: row.get(offset + 9)?,
    })
}

fn joined_from_row(row: &Row<'_>) -> rusqlite::Result<BookWithCategory> {
    let book = book_from_row(row, 0)?;
    let category_id: Option<i64> = row.get(10)?;
    let category_name: Option<String> = row.get(11)?;

    Ok(BookWithCategory {
        book,
        category: category_id
            .zip(category_name)
            .map(|(id, name)| Category { id, name }),
    })
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }
}
