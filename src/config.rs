use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Book catalog web application.
#[derive(Parser, Debug, Clone)]
#[command(name = "book-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "BOOK_CATALOG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the server (default if no command given).
    Serve {
        /// Address to bind the server to.
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Book management commands.
    Book {
        /// Book subcommand action.
        #[command(subcommand)]
        action: BookCommand,
    },

    /// Category commands.
    Category {
        /// Category subcommand action.
        #[command(subcommand)]
        action: CategoryCommand,
    },

    /// Initialize database and create default config.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Book management subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BookCommand {
    /// List books, optionally filtered.
    List {
        /// Text to search for.
        #[arg(short, long, default_value = "")]
        query: String,
        /// Field to search: title, author, publisher or isbn.
        #[arg(short, long, default_value = "title")]
        filter: String,
        /// Restrict to a category id.
        #[arg(long)]
        category: Option<i64>,
    },

    /// Show a single book.
    Show {
        /// Book ID.
        id: i64,
    },

    /// Add a book.
    Add {
        /// Book title.
        #[arg(long)]
        title: String,
        /// Author name.
        #[arg(long)]
        author: String,
        /// Year of publication.
        #[arg(long)]
        year: i64,
        /// Publisher.
        #[arg(long)]
        publisher: Option<String>,
        /// ISBN.
        #[arg(long)]
        isbn: Option<String>,
        /// Keywords.
        #[arg(long)]
        keywords: Option<String>,
        /// Cover image URL.
        #[arg(long)]
        cover_image: Option<String>,
        /// Short description.
        #[arg(long)]
        summary: Option<String>,
        /// Category ID.
        #[arg(long)]
        category: Option<i64>,
    },

    /// Delete a book.
    Del {
        /// Book ID.
        id: i64,
    },
}

/// Category subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCommand {
    /// List all categories.
    List,
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cover image configuration.
    #[serde(default)]
    pub images: ImageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Site title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            title: default_title(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::new(
        std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        8080,
    )
}

fn default_title() -> String {
    "Book Catalog".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Insert the default categories when they are missing.
    #[serde(default = "default_seed_categories")]
    pub seed_categories: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed_categories: default_seed_categories(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/catalog.db")
}

fn default_seed_categories() -> bool {
    true
}

/// Cover image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Hosts cover images may be loaded from (https only).
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["www.2ebook.com".to_string()]
}

impl ImageConfig {
    /// Check whether a cover URL points at an allowed image host.
    pub fn allows(&self, url: &str) -> bool {
        let Some(rest) = url.strip_prefix("https://") else {
            return false;
        };

        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if authority.contains('@') {
            return false;
        }
        let host = authority.split(':').next().unwrap_or_default();

        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("config.toml"),
            PathBuf::from("book-catalog.toml"),
            dirs::config_dir()
                .map(|p| p.join("book-catalog").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/book-catalog/config.toml"),
        ];

        candidates.into_iter().find(|p| p.exists())
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# book-catalog configuration

[server]
bind = "0.0.0.0:8080"
title = "Book Catalog"

[database]
# path = "/var/lib/book-catalog/catalog.db"
# Insert the nine default categories on startup if missing
seed_categories = true

[images]
# Hosts cover images may be loaded from (https only)
allowed_hosts = ["www.2ebook.com"]
"#
        .to_string()
    }
}
