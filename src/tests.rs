use crate::catalog::{BookQuery, FilterField};
use crate::config::Config;
use crate::db::{BookStore, Category, Database, MemoryStore, NewBook, SEED_CATEGORIES};
use crate::error::AppError;

fn test_db() -> Database {
    let db = Database::open_memory().unwrap();
    db.seed_categories().unwrap();
    db
}

fn new_book(title: &str, author: &str, category_id: Option<i64>) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        publication_year: 2020,
        category_id,
        ..Default::default()
    }
}

fn fill(store: &dyn BookStore) {
    let books = [
        NewBook {
            publisher: Some("O'Reilly".to_string()),
            isbn: Some("978-1-4920-5259-3".to_string()),
            ..new_book("Programming Rust", "Jim Blandy", Some(4))
        },
        NewBook {
            publisher: Some("No Starch Press".to_string()),
            ..new_book("The Rust Programming Language", "Steve Klabnik", Some(4))
        },
        new_book("Constitutional Law", "Erwin Chemerinsky", Some(1)),
        new_book("Thinking, Fast and Slow", "Daniel Kahneman", Some(5)),
        new_book("Untitled Notes", "Anonymous", None),
    ];

    for book in &books {
        store.create_book(book).unwrap();
    }
}

fn titles(store: &dyn BookStore, query: &BookQuery) -> Vec<String> {
    store
        .list_books(query)
        .unwrap()
        .into_iter()
        .map(|b| b.book.title)
        .collect()
}

fn query(text: &str, category: Option<&str>, filter: &str) -> BookQuery {
    BookQuery::from_params(Some(text), category, Some(filter)).unwrap()
}

#[test]
fn db_seed_categories_once() {
    let db = Database::open_memory().unwrap();
    assert_eq!(db.seed_categories().unwrap(), 9);
    assert_eq!(db.seed_categories().unwrap(), 0);

    let categories = db.list_categories().unwrap();
    assert_eq!(categories.len(), 9);
    assert_eq!(categories[3].id, 4);
    assert_eq!(categories[3].name, "computer science");
}

#[test]
fn db_create_and_get_book() {
    let db = test_db();
    let created = db
        .create_book(&NewBook {
            publisher: Some("Acme".to_string()),
            keywords: Some("systems, memory".to_string()),
            cover_image: Some("https://www.2ebook.com/cover.jpg".to_string()),
            summary: Some("A book".to_string()),
            ..new_book("A", "B", Some(4))
        })
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.publication_year, 2020);

    let found = db.get_book(created.id).unwrap().unwrap();
    assert_eq!(found.book, created);
    assert_eq!(
        found.category,
        Some(Category {
            id: 4,
            name: "computer science".to_string()
        })
    );
}

#[test]
fn db_omitted_optionals_are_null() {
    let db = test_db();
    let created = db.create_book(&new_book("A", "B", None)).unwrap();
    let found = db.get_book(created.id).unwrap().unwrap();

    assert_eq!(found.book.publisher, None);
    assert_eq!(found.book.isbn, None);
    assert_eq!(found.book.keywords, None);
    assert_eq!(found.book.summary, None);
    assert_eq!(found.category, None);
}

#[test]
fn db_ids_are_unique() {
    let db = test_db();
    let a = db.create_book(&new_book("A", "B", None)).unwrap();
    let b = db.create_book(&new_book("A", "B", None)).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn db_unknown_category_rejected() {
    let db = test_db();
    let err = db.create_book(&new_book("A", "B", Some(99))).unwrap_err();
    assert!(err.status().is_server_error());
    assert_eq!(db.book_count().unwrap(), 0);
}

#[test]
fn db_get_missing_book() {
    let db = test_db();
    assert!(db.get_book(12345).unwrap().is_none());
}

#[test]
fn db_delete_book_returns_row() {
    let db = test_db();
    let created = db.create_book(&new_book("To Delete", "Someone", Some(2))).unwrap();

    let deleted = db.delete_book(created.id).unwrap();
    assert_eq!(deleted, created);
    assert!(db.get_book(created.id).unwrap().is_none());
    assert_eq!(db.book_count().unwrap(), 0);
}

#[test]
fn db_delete_missing_book_fails() {
    let db = test_db();
    let err = db.delete_book(777).unwrap_err();
    assert!(matches!(err, AppError::NotFound(777)));
    assert!(err.status().is_server_error());
}

#[test]
fn db_search_by_each_filter() {
    let db = test_db();
    fill(&db);

    assert_eq!(
        titles(&db, &query("rust", None, "title")),
        ["Programming Rust", "The Rust Programming Language"]
    );
    assert_eq!(
        titles(&db, &query("kahneman", None, "author")),
        ["Thinking, Fast and Slow"]
    );
    assert_eq!(
        titles(&db, &query("starch", None, "publisher")),
        ["The Rust Programming Language"]
    );
    assert_eq!(
        titles(&db, &query("5259", None, "isbn")),
        ["Programming Rust"]
    );
}

#[test]
fn db_search_within_category() {
    let db = test_db();
    fill(&db);

    assert_eq!(
        titles(&db, &query("", Some("4"), "title")),
        ["Programming Rust", "The Rust Programming Language"]
    );
    assert!(titles(&db, &query("rust", Some("1"), "title")).is_empty());
}

#[test]
fn db_empty_query_lists_everything() {
    let db = test_db();
    fill(&db);

    assert_eq!(db.list_books(&BookQuery::all()).unwrap().len(), 5);
    // Books without a publisher never match a publisher search.
    assert_eq!(titles(&db, &query("", None, "publisher")).len(), 2);
}

#[test]
fn db_search_treats_wildcards_literally() {
    let db = test_db();
    db.create_book(&new_book("100% Rust", "A", None)).unwrap();
    db.create_book(&new_book("1000 Rusty Nails", "B", None)).unwrap();
    db.create_book(&new_book("snake_case", "C", None)).unwrap();
    db.create_book(&new_book("snakeXcase", "D", None)).unwrap();

    assert_eq!(titles(&db, &query("0%", None, "title")), ["100% Rust"]);
    assert_eq!(titles(&db, &query("e_c", None, "title")), ["snake_case"]);
}

#[test]
fn db_listing_joins_category() {
    let db = test_db();
    fill(&db);

    let books = db.list_books(&query("Constitutional", None, "title")).unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].category.as_ref().map(|c| c.name.as_str()), Some("law"));
}

#[test]
fn db_reopen_keeps_books() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.db");

    let id = {
        let db = Database::open(&path).unwrap();
        db.seed_categories().unwrap();
        db.create_book(&new_book("Persistent", "Writer", Some(8))).unwrap().id
    };

    let db = Database::open(&path).unwrap();
    let found = db.get_book(id).unwrap().unwrap();
    assert_eq!(found.book.title, "Persistent");
    assert_eq!(found.category.map(|c| c.name), Some("science".to_string()));
}

#[test]
fn memory_store_matches_database() {
    let db = test_db();
    let memory = MemoryStore::seeded();
    fill(&db);
    fill(&memory);

    let queries = [
        BookQuery::all(),
        query("RUST", None, "title"),
        query("", Some("4"), "title"),
        query("", None, "publisher"),
        query("an", None, "author"),
        query("978", None, "isbn"),
        query("nothing matches", None, "title"),
    ];

    for q in &queries {
        assert_eq!(titles(&db, q), titles(&memory, q), "{q:?}");
    }
}

#[test]
fn memory_store_delete_and_categories() {
    let store = MemoryStore::seeded();
    assert!(store.is_empty());

    let created = store.create_book(&new_book("A", "B", Some(9))).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get_book(created.id).unwrap().unwrap().category.unwrap().name,
        "social science"
    );

    assert_eq!(store.delete_book(created.id).unwrap(), created);
    assert!(matches!(
        store.delete_book(created.id),
        Err(AppError::NotFound(_))
    ));
    assert!(store.create_book(&new_book("A", "B", Some(10))).is_err());
    assert_eq!(store.list_categories().unwrap().len(), SEED_CATEGORIES.len());
}

#[test]
fn book_json_uses_camel_case() {
    let db = test_db();
    let created = db.create_book(&new_book("A", "B", Some(4))).unwrap();
    let entry = db.get_book(created.id).unwrap().unwrap();

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["publicationYear"], 2020);
    assert_eq!(json["categoryId"], 4);
    assert_eq!(json["category"]["name"], "computer science");
    assert!(json["coverImage"].is_null());
    assert!(json.get("publication_year").is_none());

    let plain = serde_json::to_value(&created).unwrap();
    assert!(plain.get("category").is_none());
}

#[test]
fn filter_field_round_trip_names() {
    for field in FilterField::ALL {
        assert_eq!(field.as_str().parse::<FilterField>().unwrap(), field);
        assert_eq!(field.to_string(), field.column());
    }
}

#[test]
fn config_parse_toml() {
    let toml = r#"
[server]
bind = "127.0.0.1:9090"
title = "Test Catalog"

[database]
path = "/tmp/test.db"
seed_categories = false

[images]
allowed_hosts = ["covers.example.org"]
"#;
    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.server.bind.port(), 9090);
    assert_eq!(config.server.title, "Test Catalog");
    assert_eq!(config.database.path.to_str(), Some("/tmp/test.db"));
    assert!(!config.database.seed_categories);
    assert_eq!(config.images.allowed_hosts, ["covers.example.org"]);
}

#[test]
fn config_default_values() {
    let config = Config::default();
    assert_eq!(config.server.bind.port(), 8080);
    assert!(config.database.seed_categories);
    assert_eq!(config.images.allowed_hosts, ["www.2ebook.com"]);
}

#[test]
fn config_generated_default_parses() {
    let config: Config = toml::from_str(&Config::generate_default()).unwrap();
    assert_eq!(config.server.bind.port(), 8080);
    assert_eq!(config.server.title, "Book Catalog");
    assert_eq!(config.images.allowed_hosts, ["www.2ebook.com"]);
}

#[test]
fn config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\ntitle = \"From Disk\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server.title, "From Disk");
    assert_eq!(config.server.bind.port(), 8080);

    std::fs::write(&path, "[server\n").unwrap();
    assert!(matches!(Config::load(&path), Err(AppError::Config(_))));
}

#[test]
fn image_host_allowlist() {
    let images = Config::default().images;

    assert!(images.allows("https://www.2ebook.com/covers/1.jpg"));
    assert!(images.allows("https://WWW.2ebook.com/x.png"));
    assert!(images.allows("https://www.2ebook.com:443/x.png"));
    assert!(!images.allows("http://www.2ebook.com/x.png"));
    assert!(!images.allows("https://evil.example/www.2ebook.com/x.png"));
    assert!(!images.allows("https://www.2ebook.com.evil.example/x.png"));
    assert!(!images.allows("https://www.2ebook.com@evil.example/x.png"));
    assert!(!images.allows("not a url"));
}
