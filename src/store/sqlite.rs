//! SQLite document store backed by the `documents` table.

use super::{DocumentKey, DocumentStore};
use crate::{
    config::database,
    entities::{Document, DocumentColumn, document},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use tracing::{debug, error, info, instrument};

/// Document store persisting to SQLite through SeaORM.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps a connection whose `documents` table already exists.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and makes sure the `documents` table exists.
    #[instrument]
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = database::connect(database_url).await?;
        database::create_tables(&db).await?;
        info!("Document store ready");
        Ok(Self::new(db))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DocumentStore for SqliteStore {
    async fn get(&self, key: DocumentKey) -> Result<Option<String>> {
        let row = Document::find_by_id(key.as_str().to_string())
            .one(&self.db)
            .await?;
        debug!("Loaded '{}': present = {}", key, row.is_some());
        Ok(row.map(|row| row.value))
    }

    async fn set(&self, key: DocumentKey, document: String) -> Result<()> {
        let model = document::ActiveModel {
            key: Set(key.as_str().to_string()),
            value: Set(document),
            updated_at: Set(chrono::Utc::now()),
        };

        Document::insert(model)
            .on_conflict(
                OnConflict::column(DocumentColumn::Key)
                    .update_columns([DocumentColumn::Value, DocumentColumn::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to write '{}': {}", key, e);
                Error::storage(key.as_str(), e.to_string())
            })?;

        Ok(())
    }

    async fn remove_all(&self, keys: &[DocumentKey]) -> Result<()> {
        let mut failed = Vec::new();
        for key in keys {
            match Document::delete_by_id(key.as_str().to_string())
                .exec(&self.db)
                .await
            {
                Ok(result) => debug!("Removed '{}' ({} rows)", key, result.rows_affected),
                Err(e) => {
                    error!("Failed to remove '{}': {}", key, e);
                    failed.push(key.as_str());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::storage(failed.join(", "), "remove rejected"))
        }
    }
}
