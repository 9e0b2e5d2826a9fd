//! book-catalog server entry point.

use book_catalog::{
    catalog::{BookQuery, CreateBookRequest},
    config::{BookCommand, CategoryCommand, Cli, Command, Config},
    db::{BookStore, Database},
    server,
};
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    // Handle command
    match cli.command {
        Some(Command::Init { force }) => cmd_init(force).await,
        Some(Command::Book { action }) => cmd_book(action, &config).await,
        Some(Command::Category { action }) => cmd_category(action, &config).await,
        Some(Command::Serve { bind }) => cmd_serve(config, bind).await,
        None => {
            // Default: start server
            cmd_serve(config, None).await
        }
    }
}

/// Open the configured database, seeding categories if enabled.
fn open_database(config: &Config) -> anyhow::Result<Database> {
    let db = Database::open(&config.database.path)?;

    if config.database.seed_categories {
        let inserted = db.seed_categories()?;
        if inserted > 0 {
            tracing::info!(inserted, "Seeded categories");
        }
    }

    Ok(db)
}

/// Initialize config and database.
async fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("config.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    // Write default config
    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());

    // Initialize database
    let config = Config::default();
    let _db = open_database(&config)?;
    println!("Initialized database: {}", config.database.path.display());

    println!("\nEdit config.toml to configure your server.");
    println!("Then run: book-catalog serve");

    Ok(())
}

/// Book management commands.
async fn cmd_book(action: BookCommand, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;

    match action {
        BookCommand::List {
            query,
            filter,
            category,
        } => {
            let category = category.map(|c| c.to_string());
            let query = BookQuery::from_params(
                Some(query.as_str()),
                category.as_deref(),
                Some(filter.as_str()),
            )?;
            let books = db.list_books(&query)?;

            if books.is_empty() {
                println!("No books found.");
            } else {
                println!(
                    "{:<6} {:<40} {:<25} {:<6} CATEGORY",
                    "ID", "TITLE", "AUTHOR", "YEAR"
                );
                println!("{}", "-".repeat(100));
                for entry in books {
                    let book = entry.book;
                    println!(
                        "{:<6} {:<40} {:<25} {:<6} {}",
                        book.id,
                        book.title,
                        book.author,
                        book.publication_year,
                        entry.category.map(|c| c.name).unwrap_or_default()
                    );
                }
            }
        }

        BookCommand::Show { id } => match db.get_book(id)? {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => println!("Book not found: {}", id),
        },

        BookCommand::Add {
            title,
            author,
            year,
            publisher,
            isbn,
            keywords,
            cover_image,
            summary,
            category,
        } => {
            let new_book = CreateBookRequest {
                title: Some(title),
                author: Some(author),
                publisher,
                publication_year: Some(year),
                isbn,
                keywords,
                cover_image,
                summary,
                category_id: category,
            }
            .into_new_book()?;

            let book = db.create_book(&new_book)?;
            println!("Added book: {} (id: {})", book.title, book.id);
        }

        BookCommand::Del { id } => match db.delete_book(id) {
            Ok(book) => println!("Deleted book: {} (id: {})", book.title, book.id),
            Err(book_catalog::AppError::NotFound(_)) => println!("Book not found: {}", id),
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}

/// Category commands.
async fn cmd_category(action: CategoryCommand, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;

    match action {
        CategoryCommand::List => {
            let categories = db.list_categories()?;
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                println!("{:<6} NAME", "ID");
                println!("{}", "-".repeat(40));
                for category in categories {
                    println!("{:<6} {}", category.id, category.name);
                }
            }
        }
    }

    Ok(())
}

/// Start the server.
async fn cmd_serve(mut config: Config, bind: Option<std::net::SocketAddr>) -> anyhow::Result<()> {
    // Override bind address if specified
    if let Some(addr) = bind {
        config.server.bind = addr;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open database
    let db = open_database(&config)?;

    tracing::info!(
        bind = %config.server.bind,
        database = %config.database.path.display(),
        books = db.book_count()?,
        "Starting book-catalog server"
    );

    // Create application state
    let state = server::AppState::new(config.clone(), db);

    // Create router
    let app = server::create_router(state);

    let listener = TcpListener::bind(config.server.bind).await?;
    tracing::info!(address = %config.server.bind, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
