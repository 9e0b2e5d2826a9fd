use crate::catalog::BookQuery;
use crate::db::*;
use crate::error::{AppError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory [`BookStore`], used in tests in place of SQLite.
///
/// Enforces the same category reference check as the database schema.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    books: BTreeMap<i64, Book>,
    categories: BTreeMap<i64, Category>,
    next_id: i64,
}

impl MemoryStore {
    /// Empty store without categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the seed categories.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut tables = store.inner.write();
            for (id, name) in SEED_CATEGORIES {
                tables.categories.insert(
                    id,
                    Category {
                        id,
                        name: name.to_string(),
                    },
                );
            }
        }
        store
    }

    /// Number of stored books.
    pub fn len(&self) -> usize {
        self.inner.read().books.len()
    }

    /// Whether no books are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Tables {
    fn join(&self, book: &Book) -> BookWithCategory {
        BookWithCategory {
            book: book.clone(),
            category: book
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
        }
    }
}

impl BookStore for MemoryStore {
    fn list_books(&self, query: &BookQuery) -> Result<Vec<BookWithCategory>> {
        let tables = self.inner.read();
        Ok(tables
            .books
            .values()
            .filter(|b| query.matches(b))
            .map(|b| tables.join(b))
            .collect())
    }

    fn get_book(&self, id: i64) -> Result<Option<BookWithCategory>> {
        let tables = self.inner.read();
        Ok(tables.books.get(&id).map(|b| tables.join(b)))
    }

    fn create_book(&self, book: &NewBook) -> Result<Book> {
        let mut tables = self.inner.write();

        if let Some(category_id) = book.category_id
            && !tables.categories.contains_key(&category_id)
        {
            return Err(AppError::Internal(format!(
                "Failed to create book: unknown category {}",
                category_id
            )));
        }

        tables.next_id += 1;
        let stored = book.with_id(tables.next_id);
        tables.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn delete_book(&self, id: i64) -> Result<Book> {
        self.inner
            .write()
            .books
            .remove(&id)
            .ok_or(AppError::NotFound(id))
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.inner.read().categories.values().cloned().collect())
    }
}
