//! In-memory document store.
//!
//! Clones share the same documents, so a repository and a test can hold the
//! same store. Reads and writes of individual keys can be made to fail on demand.

use super::{DocumentKey, DocumentStore};
use crate::errors::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<DocumentKey, String>,
    failing_writes: HashSet<DocumentKey>,
    failing_reads: HashSet<DocumentKey>,
}

/// Shared in-process document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `set` or removal of `key` fail until [`Self::heal`] is called.
    pub fn fail_writes(&self, key: DocumentKey) -> Result<()> {
        self.lock(key)?.failing_writes.insert(key);
        Ok(())
    }

    /// Makes every later `get` of `key` fail until [`Self::heal`] is called.
    pub fn fail_reads(&self, key: DocumentKey) -> Result<()> {
        self.lock(key)?.failing_reads.insert(key);
        Ok(())
    }

    /// Lets reads and writes of `key` succeed again.
    pub fn heal(&self, key: DocumentKey) -> Result<()> {
        let mut inner = self.lock(key)?;
        inner.failing_writes.remove(&key);
        inner.failing_reads.remove(&key);
        Ok(())
    }

    fn lock(&self, key: DocumentKey) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::storage(key.as_str(), "Failed to acquire store lock"))
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, key: DocumentKey) -> Result<Option<String>> {
        let inner = self.lock(key)?;
        if inner.failing_reads.contains(&key) {
            error!("Read of '{}' rejected", key);
            return Err(Error::storage(key.as_str(), "read rejected"));
        }
        Ok(inner.documents.get(&key).cloned())
    }

    async fn set(&self, key: DocumentKey, document: String) -> Result<()> {
        let mut inner = self.lock(key)?;
        if inner.failing_writes.contains(&key) {
            error!("Write to '{}' rejected", key);
            return Err(Error::storage(key.as_str(), "write rejected"));
        }
        debug!("Stored '{}' ({} bytes)", key, document.len());
        inner.documents.insert(key, document);
        Ok(())
    }

    async fn remove_all(&self, keys: &[DocumentKey]) -> Result<()> {
        let Some(first) = keys.first() else {
            return Ok(());
        };
        let mut inner = self.lock(*first)?;

        let mut failed = Vec::new();
        for key in keys {
            if inner.failing_writes.contains(key) {
                failed.push(key.as_str());
            } else {
                inner.documents.remove(key);
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            let failed = failed.join(", ");
            error!("Failed to remove: {}", failed);
            Err(Error::storage(failed, "remove rejected"))
        }
    }
}
