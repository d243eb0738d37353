//! Balance application and summary recalculation.
//!
//! The summary (`totalBalance`, `availableToSpend`) is derived entirely from the
//! bucket collection. It is persisted as its own document for fast reads and is
//! overwritten in full every time it is recalculated.

use crate::{
    errors::Result,
    models::{Bucket, BucketKind, Summary, SummaryPatch},
    store::{DocumentKey, DocumentStore, load_json, read_json, write_json},
};
use tracing::{debug, info, instrument, warn};

/// Totals for `buckets`. Depends on nothing but its input.
#[must_use]
pub fn summarize(buckets: &[Bucket]) -> Summary {
    let total_balance: f64 = buckets.iter().map(|bucket| bucket.balance).sum();
    let available_to_spend: f64 = buckets
        .iter()
        .filter(|bucket| bucket.kind == BucketKind::Discretionary)
        .map(|bucket| bucket.balance)
        .sum();

    Summary {
        total_balance,
        available_to_spend,
    }
}

/// Applies amounts to bucket balances and keeps the summary document in step.
#[derive(Debug, Clone)]
pub struct BalanceEngine<S> {
    store: S,
}

impl<S: DocumentStore> BalanceEngine<S> {
    /// Creates an engine over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds `amount` to the first bucket named exactly `bucket_name`, persists
    /// the buckets, and recalculates the summary.
    ///
    /// Returns `None` when no bucket has that name; nothing is written then.
    /// A bucket document that cannot be read is an error, not a miss.
    #[instrument(skip(self))]
    pub async fn apply_to_bucket(&self, bucket_name: &str, amount: f64) -> Result<Option<Summary>> {
        let mut buckets: Vec<Bucket> = load_json(&self.store, DocumentKey::Buckets)
            .await?
            .unwrap_or_default();

        let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.name == bucket_name) else {
            warn!("No bucket named '{}'; balance left unchanged", bucket_name);
            return Ok(None);
        };

        bucket.balance += amount;
        info!(
            "Applied {} to bucket '{}' (ID: {}): new balance = {}",
            amount, bucket.name, bucket.id, bucket.balance
        );

        write_json(&self.store, DocumentKey::Buckets, &buckets).await?;
        self.recalculate(&buckets).await.map(Some)
    }

    /// Derives the summary from `buckets` and stores it, replacing the old one.
    #[instrument(skip(self, buckets))]
    pub async fn recalculate(&self, buckets: &[Bucket]) -> Result<Summary> {
        let summary = summarize(buckets);
        write_json(&self.store, DocumentKey::AppState, &summary).await?;
        info!(
            "Recalculated summary from {} buckets: total = {}, available = {}",
            buckets.len(),
            summary.total_balance,
            summary.available_to_spend
        );
        Ok(summary)
    }

    /// The stored summary, if present and decodable.
    pub async fn stored_summary(&self) -> Option<Summary> {
        read_json(&self.store, DocumentKey::AppState).await
    }

    /// The stored summary, falling back to one derived from the current buckets.
    pub async fn summary(&self) -> Summary {
        if let Some(summary) = self.stored_summary().await {
            return summary;
        }

        let buckets: Vec<Bucket> = read_json(&self.store, DocumentKey::Buckets)
            .await
            .unwrap_or_default();
        debug!("No usable stored summary; deriving from {} buckets", buckets.len());
        summarize(&buckets)
    }

    /// Overwrites selected summary fields without recalculating.
    ///
    /// Unpatched fields keep their stored value, or the derived one when no
    /// summary is stored. Fails without writing when the store cannot be read.
    #[instrument(skip(self))]
    pub async fn update_summary(&self, patch: SummaryPatch) -> Result<Summary> {
        let current = match load_json(&self.store, DocumentKey::AppState).await? {
            Some(summary) => summary,
            None => {
                let buckets: Vec<Bucket> = load_json(&self.store, DocumentKey::Buckets)
                    .await?
                    .unwrap_or_default();
                summarize(&buckets)
            }
        };
        let summary = current.patched(patch);
        write_json(&self.store, DocumentKey::AppState, &summary).await?;
        info!(
            "Summary overwritten: total = {}, available = {}",
            summary.total_balance, summary.available_to_spend
        );
        Ok(summary)
    }
}
