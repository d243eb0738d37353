//! Document persistence - a key to JSON-text store over the three app documents.
//!
//! The store knows nothing about the shape of its documents. Callers encode and
//! decode through [`load_json`], [`read_json`] and [`write_json`], which log and
//! recover from undecodable documents instead of failing. Only [`read_json`]
//! also swallows store errors, so it is for reads that nothing is written after.

/// In-process store used by tests and throwaway sessions
pub mod memory;
/// SQLite-backed store
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::errors::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use tracing::{debug, warn};

/// The named documents the app persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    /// Array of buckets
    Buckets,
    /// Array of transactions
    Transactions,
    /// The summary object
    AppState,
}

impl DocumentKey {
    /// Every document, in wipe order.
    pub const ALL: [Self; 3] = [Self::Buckets, Self::Transactions, Self::AppState];

    /// Storage key as written on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buckets => "buckets",
            Self::Transactions => "transactions",
            Self::AppState => "appState",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value persistence for serialized documents.
///
/// Every call is a single read or write; nothing spans keys, so a failure part
/// way through a multi-document operation leaves earlier writes in place.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Returns the stored text, or `None` when the key has never been written.
    async fn get(&self, key: DocumentKey) -> Result<Option<String>>;

    /// Replaces the document stored under `key`.
    async fn set(&self, key: DocumentKey, document: String) -> Result<()>;

    /// Removes every listed key. Each removal succeeds or fails on its own;
    /// the error names the keys that could not be removed.
    async fn remove_all(&self, keys: &[DocumentKey]) -> Result<()>;
}

/// Reads and decodes a document, for callers that are about to write it back.
///
/// A store error is returned as is. An absent document is `Ok(None)`, and so is
/// one that does not decode; that case is logged and otherwise ignored.
pub async fn load_json<S, T>(store: &S, key: DocumentKey) -> Result<Option<T>>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    let Some(text) = store.get(key).await? else {
        debug!("Document '{}' is absent", key);
        return Ok(None);
    };

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Document '{}' could not be decoded, ignoring it: {}", key, e);
            Ok(None)
        }
    }
}

/// Reads and decodes a document for display.
///
/// Returns `None` when the document is absent, unreadable, or does not decode.
pub async fn read_json<S, T>(store: &S, key: DocumentKey) -> Option<T>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    load_json(store, key)
        .await
        .inspect_err(|e| warn!("Failed to read document '{}': {}", key, e))
        .ok()
        .flatten()
}

/// Encodes and stores a document.
pub async fn write_json<S, T>(store: &S, key: DocumentKey, value: &T) -> Result<()>
where
    S: DocumentStore,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value)?;
    store.set(key, text).await
}
