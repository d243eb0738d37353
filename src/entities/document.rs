//! Document entity - one row per stored JSON document.
//!
//! The app keeps three documents (`buckets`, `transactions`, `appState`); each
//! is a row keyed by its name with the serialized JSON in `value`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document database model - stores key to JSON text pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Document key (e.g., `"buckets"`, `"appState"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized JSON document
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this document was last written
    pub updated_at: DateTimeUtc,
}

/// `Document` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
