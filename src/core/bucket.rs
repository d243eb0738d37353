//! Bucket repository - create, list, update, and delete budget buckets.
//!
//! Buckets live in a single `buckets` document. Every mutation reads the whole
//! collection, changes it, and writes it back. Nothing here touches the summary;
//! callers that change balances directly must follow up with a recalculation.

use crate::{
    core::ids::IdGenerator,
    errors::{Error, Result},
    models::{Bucket, NewBucket},
    store::{DocumentKey, DocumentStore, load_json, read_json, write_json},
};
use tracing::{debug, info, instrument};

/// CRUD over the bucket collection.
#[derive(Debug)]
pub struct BucketRepository<S> {
    store: S,
    ids: IdGenerator,
}

impl<S: DocumentStore> BucketRepository<S> {
    /// Creates a repository over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: IdGenerator::new(),
        }
    }

    /// Returns every bucket in stored order.
    ///
    /// An absent or undecodable document yields an empty list.
    pub async fn list(&self) -> Vec<Bucket> {
        let buckets: Vec<Bucket> = read_json(&self.store, DocumentKey::Buckets)
            .await
            .unwrap_or_default();
        debug!("Fetched {} buckets.", buckets.len());
        buckets
    }

    /// Returns every bucket in stored order, failing when the store cannot be read.
    ///
    /// An absent or undecodable document still yields an empty list. Mutations
    /// start from this so a failed read is never written back as an empty
    /// collection.
    pub async fn load(&self) -> Result<Vec<Bucket>> {
        let buckets: Option<Vec<Bucket>> = load_json(&self.store, DocumentKey::Buckets).await?;
        Ok(buckets.unwrap_or_default())
    }

    /// Finds a bucket by id.
    pub async fn find_by_id(&self, id: &str) -> Option<Bucket> {
        self.list().await.into_iter().find(|bucket| bucket.id == id)
    }

    /// Finds the first bucket whose name matches exactly (case-sensitive).
    pub async fn find_by_name(&self, name: &str) -> Option<Bucket> {
        self.list().await.into_iter().find(|bucket| bucket.name == name)
    }

    /// Stores a new bucket under a freshly assigned id.
    #[instrument(skip(self))]
    pub async fn create(&self, new_bucket: NewBucket) -> Result<Bucket> {
        validate_bucket(&new_bucket.name, new_bucket.target, new_bucket.balance)?;

        let mut buckets = self.load().await?;
        let id = self.ids.next_id(buckets.iter().map(|bucket| bucket.id.as_str()));
        let bucket = NewBucket {
            name: new_bucket.name.trim().to_string(),
            ..new_bucket
        }
        .into_bucket(id);

        buckets.push(bucket.clone());
        self.save_all(&buckets).await?;

        info!(
            "Created bucket '{}' (ID: {}, {}): target = {}, balance = {}",
            bucket.name, bucket.id, bucket.kind, bucket.target, bucket.balance
        );
        Ok(bucket)
    }

    /// Replaces the bucket with the same id, or stores it as new when no bucket
    /// has that id. An empty id is replaced by a freshly assigned one.
    ///
    /// Returns the version that was replaced, if any.
    #[instrument(skip(self))]
    pub async fn update(&self, bucket: Bucket) -> Result<Option<Bucket>> {
        validate_bucket(&bucket.name, bucket.target, bucket.balance)?;

        let mut buckets = self.load().await?;
        let mut bucket = Bucket {
            name: bucket.name.trim().to_string(),
            ..bucket
        };

        let position = if bucket.id.is_empty() {
            None
        } else {
            buckets.iter().position(|existing| existing.id == bucket.id)
        };

        let slot = position.and_then(|index| buckets.get_mut(index));
        let previous = if let Some(existing) = slot {
            Some(std::mem::replace(existing, bucket.clone()))
        } else {
            if bucket.id.is_empty() {
                bucket.id = self.ids.next_id(buckets.iter().map(|b| b.id.as_str()));
            }
            buckets.push(bucket.clone());
            None
        };

        self.save_all(&buckets).await?;

        if previous.is_some() {
            info!("Updated bucket '{}' (ID: {})", bucket.name, bucket.id);
        } else {
            info!("Inserted bucket '{}' (ID: {}) via update", bucket.name, bucket.id);
        }
        Ok(previous)
    }

    /// Removes the bucket with `id`.
    ///
    /// Returns `false`, without writing anything, when no bucket has that id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut buckets = self.load().await?;
        let before = buckets.len();
        buckets.retain(|bucket| bucket.id != id);

        if buckets.len() == before {
            info!("No bucket with ID {} to delete.", id);
            return Ok(false);
        }

        self.save_all(&buckets).await?;
        info!("Deleted bucket ID {}", id);
        Ok(true)
    }

    /// Overwrites the whole collection.
    pub async fn save_all(&self, buckets: &[Bucket]) -> Result<()> {
        write_json(&self.store, DocumentKey::Buckets, buckets).await
    }
}

/// Checks the fields a user can type into a bucket form.
pub fn validate_bucket(name: &str, target: f64, balance: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Bucket name cannot be empty".to_string(),
        });
    }

    if !target.is_finite() || target < 0.0 {
        return Err(Error::InvalidAmount { amount: target });
    }

    if !balance.is_finite() {
        return Err(Error::InvalidAmount { amount: balance });
    }

    Ok(())
}
