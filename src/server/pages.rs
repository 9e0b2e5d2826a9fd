//! HTML pages.
//!
//! Pages are rendered on the server. The add and delete forms carry a small
//! inline script that talks to the JSON API and drives the confirmation
//! modals.

use crate::catalog::{BookQuery, FilterField};
use crate::config::ImageConfig;
use crate::db::{BookWithCategory, Category};
use crate::error::AppError;
use crate::pagination::Pagination;
use crate::server::{AppState, QueryParams};
use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write;

/// Fallback for absent short fields.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Fallback for an absent summary.
pub const NO_DESCRIPTION: &str = "No description";
/// Placeholder when no cover can be shown.
pub const NO_COVER: &str = "No cover image";
/// Search error shown when the store fails.
pub const SEARCH_UNAVAILABLE: &str = "Unable to load books. Please try again later.";

const STYLE: &str = r#"
        body { font-family: system-ui, sans-serif; background: #e5e7eb; margin: 0; padding: 2rem 1rem; color: #1f2937; }
        main { max-width: 56rem; margin: 0 auto; background: #fff; padding: 2rem; border-radius: 12px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
        h1 { text-align: center; }
        a { color: #2563eb; }
        .back { font-size: 2rem; text-decoration: none; }
        .error { color: #dc2626; text-align: center; }
        label { display: block; font-size: .875rem; color: #6b7280; margin-top: 1rem; }
        input[type=text], input[type=number], select, textarea { width: 100%; box-sizing: border-box; margin-top: .5rem; padding: .75rem; border: 1px solid #d1d5db; border-radius: 8px; }
        .filters label { display: inline-flex; gap: .5rem; margin-right: 1.5rem; }
        button, .button { background: #000; color: #fff; border: 0; padding: .9rem 2rem; border-radius: 8px; cursor: pointer; margin-top: 1rem; }
        button.danger { background: #dc2626; }
        button.secondary { background: #9ca3af; }
        table { width: 100%; border-collapse: collapse; }
        th { background: #000; color: #fff; text-align: left; }
        th, td { border: 1px solid #e5e7eb; padding: .75rem; }
        .pagination { display: flex; justify-content: center; gap: .25rem; margin-top: 1rem; flex-wrap: wrap; }
        .pagination a { padding: .5rem 1rem; background: #e5e7eb; text-decoration: none; color: #1f2937; }
        .pagination a.current { background: #3b82f6; color: #fff; }
        .pagination a.disabled { opacity: .5; pointer-events: none; }
        .book { display: flex; gap: 2rem; flex-wrap: wrap; }
        .cover { flex: 0 0 300px; }
        .cover img { width: 100%; border-radius: 8px; }
        .no-cover { height: 450px; background: #e5e7eb; display: flex; align-items: center; justify-content: center; border-radius: 8px; color: #6b7280; }
        .modal { position: fixed; inset: 0; background: rgba(0,0,0,.5); display: flex; align-items: center; justify-content: center; }
        .modal[hidden] { display: none; }
        .modal > div { background: #fff; padding: 3rem; border-radius: 8px; text-align: center; max-width: 32rem; }
"#;

const ADD_BOOK_SCRIPT: &str = r#"
const form = document.getElementById('add-book');
const errorBox = document.getElementById('error');
const modal = document.getElementById('added-modal');

function showError(message) {
  errorBox.textContent = message;
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const data = new FormData(form);
  const title = data.get('title');
  const author = data.get('author');
  const publicationYear = data.get('publicationYear');

  if (!title || !author || !publicationYear) {
    showError('Please fill in the required fields.');
    return;
  }

  const categoryId = data.get('categoryId');
  const body = {
    title,
    author,
    publisher: data.get('publisher'),
    publicationYear: parseInt(publicationYear, 10),
    isbn: data.get('isbn'),
    coverImage: data.get('coverImage'),
    summary: data.get('summary'),
    categoryId: categoryId ? parseInt(categoryId, 10) : null,
  };

  try {
    const res = await fetch('/api/books', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });

    if (res.ok) {
      showError('');
      modal.hidden = false;
    } else {
      const payload = await res.json().catch(() => ({}));
      showError(payload.error || 'Error occurred while adding the book.');
    }
  } catch (err) {
    console.error('Error adding book:', err);
    showError('Internal Server Error');
  }
});

document.getElementById('added-ok').addEventListener('click', () => {
  modal.hidden = true;
  window.location.href = '/';
});
"#;

const DELETE_BOOK_SCRIPT: &str = r#"
const form = document.getElementById('del-book');
const select = document.getElementById('book');
const errorBox = document.getElementById('error');
const confirmModal = document.getElementById('confirm-modal');
const doneModal = document.getElementById('deleted-modal');

function showError(message) {
  errorBox.textContent = message;
}

async function loadBooks() {
  try {
    const res = await fetch('/api/books');
    if (!res.ok) {
      showError('Error fetching books.');
      return;
    }
    const books = await res.json();
    for (const book of books) {
      const option = document.createElement('option');
      option.value = book.id;
      option.textContent = `${book.title} - ${book.author}`;
      select.appendChild(option);
    }
  } catch (err) {
    console.error('Error fetching books:', err);
    showError('Internal Server Error');
  }
}

form.addEventListener('submit', (event) => {
  event.preventDefault();
  if (!select.value) {
    showError('Please select a book.');
    return;
  }
  confirmModal.hidden = false;
});

document.getElementById('confirm-delete').addEventListener('click', async () => {
  try {
    const res = await fetch(`/api/books?id=${encodeURIComponent(select.value)}`, {
      method: 'DELETE',
    });
    if (res.ok) {
      showError('');
      doneModal.hidden = false;
    } else {
      const payload = await res.json().catch(() => ({}));
      showError(payload.error || 'Error occurred while deleting the book.');
    }
  } catch (err) {
    console.error('Error deleting book:', err);
    showError('Internal Server Error');
  } finally {
    confirmModal.hidden = true;
  }
});

document.getElementById('cancel-delete').addEventListener('click', () => {
  confirmModal.hidden = true;
});

document.getElementById('deleted-ok').addEventListener('click', () => {
  doneModal.hidden = true;
  window.location.href = '/';
});

loadBooks();
"#;

/// Escape text for HTML content and attribute values.
fn esc(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Text of an optional field, or the fallback when absent or empty.
fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> Cow<'a, str> {
    match value {
        Some(v) if !v.is_empty() => esc(v),
        _ => Cow::Borrowed(fallback),
    }
}

/// Wrap page content in the common document shell.
fn layout(site_title: &str, heading: &str, back: Option<&str>, content: &str) -> String {
    let back = back
        .map(|href| format!(r#"<a class="back" href="{}" aria-label="Back">&larr;</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{heading} - {site_title}</title>
    <style>{style}</style>
</head>
<body>
<main>
    {back}
    <h1>{heading}</h1>
{content}
</main>
</body>
</html>"#,
        heading = esc(heading),
        site_title = esc(site_title),
        style = STYLE,
        back = back,
        content = content,
    )
}

fn category_options(categories: &[Category], selected: Option<i64>) -> String {
    let mut html = String::new();
    for category in categories {
        let _ = writeln!(
            html,
            r#"            <option value="{id}"{sel}>{name}</option>"#,
            id = category.id,
            sel = if selected == Some(category.id) { " selected" } else { "" },
            name = esc(&category.name),
        );
    }
    html
}

// ============================================================================
// RENDERING
// ============================================================================

/// Home page with the search form.
pub fn render_home(site_title: &str, categories: &[Category]) -> String {
    let mut filters = String::new();
    for field in FilterField::ALL {
        let _ = writeln!(
            filters,
            r#"            <label><input type="radio" name="filter" value="{value}"{checked}> {label}</label>"#,
            value = field.as_str(),
            checked = if field == FilterField::Title { " checked" } else { "" },
            label = field.label(),
        );
    }

    let content = format!(
        r#"    <form method="get" action="/search" id="search">
        <label for="query">Search for a book</label>
        <input id="query" type="text" name="query" placeholder="Search books">
        <label for="category">Category</label>
        <select id="category" name="category">
            <option value="">All</option>
{options}        </select>
        <div class="filters">
{filters}        </div>
        <button type="submit">Search</button>
    </form>
    <p><a href="/add-book">Add a book</a> &middot; <a href="/del-book">Delete a book</a></p>"#,
        options = category_options(categories, None),
        filters = filters,
    );

    layout(site_title, "Start your search", None, &content)
}

/// Search results page.
///
/// `result` is the outcome of the list operation; an error is rendered
/// inline above an empty table.
pub fn render_search(
    site_title: &str,
    params: &SearchPageParams,
    result: Result<&[BookWithCategory], &AppError>,
) -> String {
    let mut content = String::new();

    let books: &[BookWithCategory] = match result {
        Ok(books) => books,
        Err(e) => {
            let message = if e.status().is_client_error() {
                e.to_string()
            } else {
                SEARCH_UNAVAILABLE.to_string()
            };
            let _ = writeln!(content, r#"    <p class="error">{}</p>"#, esc(&message));
            &[]
        }
    };

    let pagination = Pagination::new(books.len(), params.page_number());
    let start = pagination.start();

    content.push_str(
        r#"    <table>
        <thead>
            <tr><th>#</th><th>Title</th><th>Author</th><th>Publisher</th><th>Details</th></tr>
        </thead>
        <tbody>
"#,
    );

    let page = pagination.slice(books);
    if page.is_empty() {
        content.push_str(
            "            <tr><td colspan=\"5\" class=\"empty\">No books found</td></tr>\n",
        );
    }
    for (index, entry) in page.iter().enumerate() {
        let book = &entry.book;
        let _ = writeln!(
            content,
            r#"            <tr><td>{n}</td><td>{title}</td><td>{author}</td><td>{publisher}</td><td><a href="/books/{id}">View</a></td></tr>"#,
            n = start + index + 1,
            title = esc(&book.title),
            author = esc(&book.author),
            publisher = esc(book.publisher.as_deref().unwrap_or_default()),
            id = book.id,
        );
    }
    content.push_str("        </tbody>\n    </table>\n");
    content.push_str(&render_pagination(params, &pagination));

    layout(site_title, "Search results", Some("/"), &content)
}

fn render_pagination(params: &SearchPageParams, pagination: &Pagination) -> String {
    let link = |page: usize, label: &str, disabled: bool, current: bool| {
        if disabled {
            format!(r#"<a class="disabled" aria-disabled="true">{label}</a>"#)
        } else {
            format!(
                r#"<a{class} href="{href}">{label}</a>"#,
                class = if current { r#" class="current""# } else { "" },
                href = esc(&params.page_href(page)),
            )
        }
    };

    let mut html = String::from("    <nav class=\"pagination\">\n");
    let first = pagination.is_first();
    let last = pagination.is_last();

    let _ = writeln!(html, "        {}", link(1, "First", first, false));
    let _ = writeln!(html, "        {}", link(pagination.previous(), "Previous", first, false));
    for page in pagination.pages() {
        let current = page == pagination.current;
        let _ = writeln!(html, "        {}", link(page, &page.to_string(), false, current));
    }
    let _ = writeln!(html, "        {}", link(pagination.next(), "Next", last, false));
    let _ = writeln!(
        html,
        "        {}",
        link(pagination.last_page(), "Last", last, false)
    );
    html.push_str("    </nav>\n");
    html
}

/// Book detail page.
pub fn render_book(site_title: &str, images: &ImageConfig, entry: &BookWithCategory) -> String {
    let book = &entry.book;

    let cover = match book.cover_image.as_deref() {
        Some(url) if images.allows(url) => format!(
            r#"<img src="{src}" alt="{alt}" width="300" height="450">"#,
            src = esc(url),
            alt = esc(&book.title),
        ),
        _ => format!(r#"<div class="no-cover">{NO_COVER}</div>"#),
    };

    let year = if book.publication_year != 0 {
        Cow::Owned(book.publication_year.to_string())
    } else {
        Cow::Borrowed(NOT_SPECIFIED)
    };

    let content = format!(
        r#"    <div class="book">
        <div class="cover">{cover}</div>
        <div class="details">
            <h2>{title}</h2>
            <p><strong>Author:</strong> {author}</p>
            <p><strong>Publisher:</strong> {publisher}</p>
            <p><strong>Publication year:</strong> {year}</p>
            <p><strong>ISBN:</strong> {isbn}</p>
            <p><strong>Category:</strong> {category}</p>
            <p><strong>Description:</strong> {summary}</p>
        </div>
    </div>"#,
        cover = cover,
        title = esc(&book.title),
        author = esc(&book.author),
        publisher = or_fallback(book.publisher.as_deref(), NOT_SPECIFIED),
        year = year,
        isbn = or_fallback(book.isbn.as_deref(), NOT_SPECIFIED),
        category = or_fallback(
            entry.category.as_ref().map(|c| c.name.as_str()),
            NOT_SPECIFIED
        ),
        summary = or_fallback(book.summary.as_deref(), NO_DESCRIPTION),
    );

    layout(site_title, "Book details", Some("javascript:history.back()"), &content)
}

/// Page shown when a book id does not resolve.
pub fn render_not_found(site_title: &str) -> String {
    layout(
        site_title,
        "Book not found",
        Some("/"),
        r#"    <p class="not-found">The book you are looking for is not in the catalog.</p>"#,
    )
}

/// Add-book form.
pub fn render_add_book(site_title: &str, categories: &[Category]) -> String {
    let default_category = categories.first().map(|c| c.id);

    let content = format!(
        r#"    <form id="add-book">
        <label for="title">Title</label>
        <input id="title" type="text" name="title" placeholder="Book title" required>
        <label for="author">Author</label>
        <input id="author" type="text" name="author" placeholder="Author name" required>
        <label for="publisher">Publisher</label>
        <input id="publisher" type="text" name="publisher" placeholder="Publisher">
        <label for="publicationYear">Publication year</label>
        <input id="publicationYear" type="number" name="publicationYear" placeholder="Publication year" required>
        <label for="isbn">ISBN</label>
        <input id="isbn" type="text" name="isbn" placeholder="ISBN">
        <label for="coverImage">Cover image URL</label>
        <input id="coverImage" type="text" name="coverImage" placeholder="Cover image URL">
        <label for="summary">Description</label>
        <textarea id="summary" name="summary" placeholder="Book description"></textarea>
        <label for="categoryId">Category</label>
        <select id="categoryId" name="categoryId">
{options}        </select>
        <button type="submit">Add book</button>
    </form>
    <p><a href="/del-book">Delete a book</a></p>
    <p class="error" id="error"></p>
    <div class="modal" id="added-modal" hidden>
        <div>
            <h2>New book added</h2>
            <button type="button" id="added-ok">OK</button>
        </div>
    </div>
    <script>{script}</script>"#,
        options = category_options(categories, default_category),
        script = ADD_BOOK_SCRIPT,
    );

    layout(site_title, "Add a new book", Some("/"), &content)
}

/// Delete-book form.
pub fn render_del_book(site_title: &str) -> String {
    let content = format!(
        r#"    <form id="del-book">
        <label for="book">Select a book</label>
        <select id="book" name="book" required>
            <option value="">-- Select a book --</option>
        </select>
        <button type="submit" class="danger">Delete book</button>
    </form>
    <p class="error" id="error"></p>
    <div class="modal" id="confirm-modal" hidden>
        <div>
            <h2>Are you sure you want to delete this book?</h2>
            <button type="button" class="danger" id="confirm-delete">Delete</button>
            <button type="button" class="secondary" id="cancel-delete">Cancel</button>
        </div>
    </div>
    <div class="modal" id="deleted-modal" hidden>
        <div>
            <h2>Book deleted</h2>
            <button type="button" id="deleted-ok">OK</button>
        </div>
    </div>
    <script>{script}</script>"#,
        script = DELETE_BOOK_SCRIPT,
    );

    layout(site_title, "Delete a book", Some("/"), &content)
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Search page query parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchPageParams {
    /// Text to search for.
    pub query: Option<String>,
    /// Category id.
    pub category: Option<String>,
    /// Filter field.
    pub filter: Option<String>,
    /// Requested page.
    pub page: Option<String>,
}

impl SearchPageParams {
    /// Pick the search parameters out of a query string.
    pub fn from_query(params: &QueryParams) -> Self {
        let field = |key| params.get(key).map(str::to_string);
        Self {
            query: field("query"),
            category: field("category"),
            filter: field("filter"),
            page: field("page"),
        }
    }

    /// Requested page, 1 when absent or unparsable.
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }

    /// Link to another page of the same search.
    pub fn page_href(&self, page: usize) -> String {
        format!(
            "/search?query={}&category={}&filter={}&page={}",
            urlencoding::encode(self.query.as_deref().unwrap_or_default()),
            urlencoding::encode(self.category.as_deref().unwrap_or_default()),
            urlencoding::encode(self.filter.as_deref().unwrap_or_default()),
            page
        )
    }
}

/// Home page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_home(&state.config.server.title, &state.categories()))
}

/// Search results page.
pub async fn search(
    State(state): State<AppState>,
    raw: QueryParams,
) -> Html<String> {
    let params = SearchPageParams::from_query(&raw);
    let result = BookQuery::from_params(
        params.query.as_deref(),
        params.category.as_deref(),
        params.filter.as_deref(),
    )
    .and_then(|query| state.store.list_books(&query));

    if let Err(e) = &result
        && e.status().is_server_error()
    {
        tracing::error!(error = %e, "Search failed");
    }

    Html(render_search(
        &state.config.server.title,
        &params,
        result.as_deref(),
    ))
}

/// Book detail page.
pub async fn book_detail(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> impl IntoResponse {
    let title = &state.config.server.title;

    let book = match id.ok().and_then(|Path(id)| id.parse::<i64>().ok()) {
        Some(id) => state.store.get_book(id).unwrap_or_else(|e| {
            tracing::error!(id, error = %e, "Failed to fetch book details");
            None
        }),
        None => None,
    };

    match book {
        Some(entry) => (
            StatusCode::OK,
            Html(render_book(title, &state.config.images, &entry)),
        ),
        None => (StatusCode::NOT_FOUND, Html(render_not_found(title))),
    }
}

/// Add-book form page.
pub async fn add_book(State(state): State<AppState>) -> Html<String> {
    Html(render_add_book(
        &state.config.server.title,
        &state.categories(),
    ))
}

/// Delete-book form page.
pub async fn del_book(State(state): State<AppState>) -> Html<String> {
    Html(render_del_book(&state.config.server.title))
}
