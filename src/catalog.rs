//! Book API rules: search parameters, create validation, id parsing.
//!
//! Everything here is independent of HTTP so the same rules apply to the
//! JSON API, the HTML pages, and the command line.

use crate::db::{Book, NewBook};
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Column a text search is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterField {
    /// Book title.
    #[default]
    Title,
    /// Author name.
    Author,
    /// Publisher.
    Publisher,
    /// ISBN.
    Isbn,
}

impl FilterField {
    /// All filter fields, in display order.
    pub const ALL: [FilterField; 4] = [
        FilterField::Title,
        FilterField::Author,
        FilterField::Publisher,
        FilterField::Isbn,
    ];

    /// Query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Title => "title",
            FilterField::Author => "author",
            FilterField::Publisher => "publisher",
            FilterField::Isbn => "isbn",
        }
    }

    /// Column name in the `books` table.
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Title => "title",
            FilterField::Author => "author",
            FilterField::Publisher => "publisher",
            FilterField::Isbn => "isbn",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Title => "Title",
            FilterField::Author => "Author",
            FilterField::Publisher => "Publisher",
            FilterField::Isbn => "ISBN",
        }
    }

    /// Value of this field on a book.
    pub fn value<'a>(&self, book: &'a Book) -> Option<&'a str> {
        match self {
            FilterField::Title => Some(&book.title),
            FilterField::Author => Some(&book.author),
            FilterField::Publisher => book.publisher.as_deref(),
            FilterField::Isbn => book.isbn.as_deref(),
        }
    }
}

impl FromStr for FilterField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "title" => Ok(FilterField::Title),
            "author" => Ok(FilterField::Author),
            "publisher" => Ok(FilterField::Publisher),
            "isbn" => Ok(FilterField::Isbn),
            _ => Err(AppError::InvalidFilter),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated book search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Substring to look for. Empty matches every non-null value.
    pub text: String,
    /// Restrict to one category.
    pub category_id: Option<i64>,
    /// Column the text is matched against.
    pub filter: FilterField,
}

impl BookQuery {
    /// Query matching every book.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from raw request parameters.
    ///
    /// Missing or empty `filter` means title, missing or blank `category`
    /// means all categories.
    pub fn from_params(
        query: Option<&str>,
        category: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Self> {
        let filter = match filter {
            Some(f) if !f.is_empty() => f.parse()?,
            _ => FilterField::Title,
        };

        let category_id = match category.map(str::trim) {
            Some(c) if !c.is_empty() => Some(c.parse().map_err(|_| AppError::InvalidCategory)?),
            _ => None,
        };

        Ok(Self {
            text: query.unwrap_or_default().to_string(),
            category_id,
            filter,
        })
    }

    /// Check a book against this query.
    ///
    /// Matching is a substring test that ignores ASCII case, like SQLite's
    /// `LIKE`.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(category_id) = self.category_id
            && book.category_id != Some(category_id)
        {
            return false;
        }

        match self.filter.value(book) {
            Some(value) => value
                .to_ascii_lowercase()
                .contains(&self.text.to_ascii_lowercase()),
            None => false,
        }
    }
}

/// Body of a create request. Every field may be absent on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    /// Book title.
    pub title: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Year of publication.
    pub publication_year: Option<i64>,
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

impl CreateBookRequest {
    /// Check required fields and convert into a store insert.
    ///
    /// Title and author must be non-empty and the year must be non-zero.
    pub fn into_new_book(self) -> Result<NewBook> {
        let title = self.title.filter(|t| !t.is_empty());
        let author = self.author.filter(|a| !a.is_empty());
        let year = self.publication_year.filter(|y| *y != 0);

        let (Some(title), Some(author), Some(publication_year)) = (title, author, year) else {
            return Err(AppError::MissingFields);
        };

        Ok(NewBook {
            title,
            author,
            publisher: self.publisher,
            publication_year,
            isbn: self.isbn,
            keywords: self.keywords,
            cover_image: self.cover_image,
            summary: self.summary,
            category_id: self.category_id,
        })
    }
}

/// Parse a book id taken from a query parameter.
pub fn parse_book_id(raw: Option<&str>) -> Result<i64> {
    match raw.map(str::trim) {
        None | Some("") => Err(AppError::MissingId),
        Some(id) => id.parse().map_err(|_| AppError::InvalidId),
    }
}
