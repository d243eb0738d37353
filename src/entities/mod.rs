//! Entity module - SeaORM entity definitions for the database.
//! The SQLite backend stores every app document in a single key/value table.

pub mod document;

pub use document::{Column as DocumentColumn, Entity as Document, Model as DocumentModel};
