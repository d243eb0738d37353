//! Database configuration module.
//!
//! Opens the SQLite connection and creates the `documents` table from its
//! entity definition, so the schema always matches the Rust model.

use crate::entities::Document;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::debug;

/// Creates the parent directory of a file-backed `SQLite` URL
/// (`sqlite://data/app.sqlite?mode=rwc`) so the database file can be created.
pub fn prepare_sqlite_path(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        debug!("Ensured database directory {}", parent.display());
    }
    Ok(())
}

/// Opens a connection to `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `documents` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut document_table = schema.create_table_from_entity(Document);
    document_table.if_not_exists();

    db.execute(builder.build(&document_table)).await?;
    Ok(())
}
