//! Configuration management - environment settings, database setup, and seed data.

/// Database connection and table creation
pub mod database;

/// Seed dataset loading from TOML
pub mod seed;

use std::path::PathBuf;
use tracing::debug;

/// Default SQLite location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/bucketbook.sqlite?mode=rwc";

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SeaORM connection string
    pub database_url: String,
    /// Optional TOML file replacing the built-in seed data
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `DATABASE_URL` and `BUCKETBOOK_SEED`.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|name| std::env::var(name).ok());
        debug!("Loaded configuration: {:?}", config);
        config
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let seed_path = lookup("BUCKETBOOK_SEED")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Self {
            database_url,
            seed_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = AppConfig::from_lookup(|name| match name {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "BUCKETBOOK_SEED" => Some("seed.toml".to_string()),
            _ => None,
        });
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.seed_path, Some(PathBuf::from("seed.toml")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(config.seed_path.is_none());
    }
}
