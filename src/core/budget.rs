//! The budget facade - every operation the presentation layer calls.
//!
//! `Budget` owns one repository per collection, all sharing the store handle it
//! was built with. Screens call it and re-fetch afterwards; nothing here caches.

use crate::{
    config::seed::SeedConfig,
    core::{
        balance::{BalanceEngine, summarize},
        bucket::BucketRepository,
        report::{self, Overview},
        transaction::TransactionRepository,
    },
    errors::Result,
    models::{Bucket, NewBucket, NewTransaction, Summary, SummaryPatch, Transaction},
    store::{DocumentKey, DocumentStore, write_json},
};
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Stored summary that disagrees with the bucket balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryDrift {
    /// What the `appState` document holds, if it is readable
    pub stored: Option<Summary>,
    /// What the buckets add up to
    pub derived: Summary,
}

const DRIFT_TOLERANCE: f64 = 1e-9;

/// Buckets, transactions, and the summary over one document store.
#[derive(Debug)]
pub struct Budget<S> {
    store: S,
    buckets: BucketRepository<S>,
    transactions: TransactionRepository<S>,
    balances: BalanceEngine<S>,
}

impl<S: DocumentStore + Clone> Budget<S> {
    /// Builds the repositories over `store`.
    pub fn new(store: S) -> Self {
        Self {
            buckets: BucketRepository::new(store.clone()),
            transactions: TransactionRepository::new(store.clone()),
            balances: BalanceEngine::new(store.clone()),
            store,
        }
    }

    /// Writes the seed data for every document that does not exist yet.
    ///
    /// Documents already present are left alone. Returns the keys written.
    #[instrument(skip(self, seed))]
    pub async fn initialize(&self, seed: &SeedConfig) -> Result<Vec<DocumentKey>> {
        let mut written = Vec::new();

        if self.store.get(DocumentKey::Buckets).await?.is_none() {
            self.buckets.save_all(&seed.buckets()).await?;
            written.push(DocumentKey::Buckets);
        }

        if self.store.get(DocumentKey::Transactions).await?.is_none() {
            write_json(
                &self.store,
                DocumentKey::Transactions,
                &seed.transactions(Utc::now())?,
            )
            .await?;
            written.push(DocumentKey::Transactions);
        }

        if self.store.get(DocumentKey::AppState).await?.is_none() {
            self.balances.recalculate(&self.buckets.load().await?).await?;
            written.push(DocumentKey::AppState);
        }

        if written.is_empty() {
            info!("All documents present; nothing to seed.");
        } else {
            info!("Seeded documents: {:?}", written);
        }
        Ok(written)
    }

    /// Every bucket.
    pub async fn list_buckets(&self) -> Vec<Bucket> {
        self.buckets.list().await
    }

    /// Looks up a bucket by id.
    pub async fn get_bucket(&self, id: &str) -> Option<Bucket> {
        self.buckets.find_by_id(id).await
    }

    /// Stores a new bucket. The summary is not recalculated.
    pub async fn create_bucket(&self, new_bucket: NewBucket) -> Result<Bucket> {
        self.buckets.create(new_bucket).await
    }

    /// Replaces (or inserts) a bucket. The summary is not recalculated.
    ///
    /// Transactions refer to buckets by name, so a rename leaves the old
    /// name's transactions pointing at nothing; that is logged, not repaired.
    pub async fn update_bucket(&self, bucket: Bucket) -> Result<()> {
        let new_name = bucket.name.trim().to_string();
        let previous = self.buckets.update(bucket).await?;

        if let Some(previous) = previous.filter(|previous| previous.name != new_name) {
            let detached = self.transactions.count_for_bucket(&previous.name).await;
            if detached > 0 {
                warn!(
                    "Bucket '{}' renamed to '{}'; {} transactions still reference the old name",
                    previous.name, new_name, detached
                );
            }
        }
        Ok(())
    }

    /// Removes a bucket; unknown ids are a no-op. The summary is not recalculated.
    pub async fn delete_bucket(&self, id: &str) -> Result<bool> {
        self.buckets.delete(id).await
    }

    /// Every transaction, in stored order.
    pub async fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.list().await
    }

    /// Records a transaction and applies it to its bucket.
    pub async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.transactions.create(new_transaction).await
    }

    /// Reverses and removes a transaction; unknown ids are a no-op.
    pub async fn delete_transaction(&self, id: &str) -> Result<bool> {
        self.transactions.delete(id).await
    }

    /// Total balance and available-to-spend.
    pub async fn get_summary(&self) -> Summary {
        self.balances.summary().await
    }

    /// Overwrites selected summary fields as given, without recalculating.
    pub async fn update_summary(&self, patch: SummaryPatch) -> Result<Summary> {
        self.balances.update_summary(patch).await
    }

    /// Recomputes the summary from the current buckets and stores it.
    pub async fn rebuild_summary(&self) -> Result<Summary> {
        self.balances.recalculate(&self.buckets.load().await?).await
    }

    /// Compares the stored summary against the buckets.
    ///
    /// Returns `None` when they agree.
    pub async fn summary_drift(&self) -> Option<SummaryDrift> {
        let derived = summarize(&self.buckets.list().await);
        let stored = self.balances.stored_summary().await;

        let agrees = stored.is_some_and(|stored| {
            (stored.total_balance - derived.total_balance).abs() <= DRIFT_TOLERANCE
                && (stored.available_to_spend - derived.available_to_spend).abs()
                    <= DRIFT_TOLERANCE
        });

        if agrees {
            None
        } else {
            Some(SummaryDrift { stored, derived })
        }
    }

    /// Summary, buckets with progress, and the most recent transactions.
    pub async fn overview(&self, recent_limit: usize) -> Overview {
        report::build_overview(
            self.get_summary().await,
            &self.list_buckets().await,
            self.list_transactions().await,
            recent_limit,
        )
    }

    /// Deletes all three documents. Each removal can fail on its own.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        self.store.remove_all(&DocumentKey::ALL).await?;
        info!("All app data removed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;
    use crate::models::BucketKind;
    use crate::store::MemoryStore;
    use crate::test_utils::*;

    async fn snapshot(store: &MemoryStore) -> Result<Vec<Option<String>>> {
        let mut documents = Vec::new();
        for key in DocumentKey::ALL {
            documents.push(store.get(key).await?);
        }
        Ok(documents)
    }

    #[tokio::test]
    async fn test_initialize_seeds_builtin_data() -> Result<()> {
        let (_, budget) = setup_memory_budget();
        let seed = SeedConfig::builtin()?;

        let written = budget.initialize(&seed).await?;

        assert_eq!(written, DocumentKey::ALL.to_vec());
        assert_eq!(budget.list_buckets().await.len(), 6);
        assert_eq!(budget.list_transactions().await.len(), 4);
        let summary = budget.get_summary().await;
        assert_eq!(summary.total_balance, 1025.0);
        assert_eq!(summary.available_to_spend, 225.0);
        assert!(budget.summary_drift().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_documents() -> Result<()> {
        let (store, budget) = setup_memory_budget();
        budget.buckets.save_all(&scenario_buckets()).await?;

        let written = budget.initialize(&SeedConfig::builtin()?).await?;

        assert_eq!(
            written,
            vec![DocumentKey::Transactions, DocumentKey::AppState]
        );
        assert_eq!(budget.list_buckets().await, scenario_buckets());
        assert_eq!(budget.get_summary().await.total_balance, 675.0);

        let before = snapshot(&store).await?;
        assert!(budget.initialize(&SeedConfig::builtin()?).await?.is_empty());
        assert_eq!(snapshot(&store).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_create_then_delete_transaction() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;
        assert_eq!(
            budget.get_summary().await,
            Summary {
                total_balance: 675.0,
                available_to_spend: 75.0
            }
        );

        let transaction = budget
            .create_transaction(new_transaction("Dining", 50.0))
            .await?;
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 125.0);
        assert_eq!(
            budget.get_summary().await,
            Summary {
                total_balance: 725.0,
                available_to_spend: 125.0
            }
        );

        assert!(budget.delete_transaction(&transaction.id).await?);
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 75.0);
        assert_eq!(
            budget.get_summary().await,
            Summary {
                total_balance: 675.0,
                available_to_spend: 75.0
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_on_sqlite() -> Result<()> {
        let budget = setup_sqlite_budget().await?;
        budget.buckets.save_all(&scenario_buckets()).await?;
        budget.rebuild_summary().await?;

        let transaction = budget
            .create_transaction(new_transaction("Dining", 50.0))
            .await?;
        assert_eq!(budget.get_summary().await.available_to_spend, 125.0);

        budget.delete_transaction(&transaction.id).await?;
        assert_eq!(budget.get_summary().await.total_balance, 675.0);
        assert_eq!(budget.list_buckets().await, scenario_buckets());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_unknown_ids_changes_nothing() -> Result<()> {
        let (store, budget) = setup_scenario_budget().await?;
        budget
            .create_transaction(new_transaction("Rent", 10.0))
            .await?;
        let before = snapshot(&store).await?;

        assert!(!budget.delete_bucket("404").await?);
        assert!(!budget.delete_transaction("404").await?);

        assert_eq!(snapshot(&store).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_spend_lowers_balance_and_available() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;

        let spent = budget
            .create_transaction(NewTransaction::spend("Dining", 20.0, false))
            .await?;

        assert_eq!(spent.amount, -20.0);
        assert_eq!(budget.list_transactions().await[0].amount, -20.0);
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 55.0);
        assert_eq!(
            budget.get_summary().await,
            Summary {
                total_balance: 655.0,
                available_to_spend: 55.0
            }
        );

        budget
            .create_transaction(NewTransaction::deposit("Dining", 20.0, false))
            .await?;
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 75.0);
        assert_eq!(budget.get_summary().await.available_to_spend, 75.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_rebuild_fails_when_buckets_unreadable() -> Result<()> {
        let (store, budget) = setup_scenario_budget().await?;
        let before = snapshot(&store).await?;
        store.fail_reads(DocumentKey::Buckets)?;

        assert!(matches!(
            budget.rebuild_summary().await,
            Err(Error::Storage { .. })
        ));
        assert!(matches!(
            budget
                .create_bucket(new_bucket("Travel", BucketKind::Discretionary, 500.0, 0.0))
                .await,
            Err(Error::Storage { .. })
        ));

        store.heal(DocumentKey::Buckets)?;
        assert_eq!(snapshot(&store).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_edits_need_rebuild() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;

        budget
            .create_bucket(new_bucket("Travel", BucketKind::Discretionary, 500.0, 40.0))
            .await?;
        let drift = budget.summary_drift().await.unwrap();
        assert_eq!(drift.stored.unwrap().total_balance, 675.0);
        assert_eq!(drift.derived.total_balance, 715.0);

        let summary = budget.rebuild_summary().await?;
        assert_eq!(summary.available_to_spend, 115.0);
        assert!(budget.summary_drift().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_detaches_transactions() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;
        budget
            .create_transaction(new_transaction("Dining", 10.0))
            .await?;

        let mut dining = budget.get_bucket("2").await.unwrap();
        dining.name = "Eating Out".to_string();
        budget.update_bucket(dining).await?;

        let orphan = budget
            .create_transaction(new_transaction("Dining", 10.0))
            .await?;
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 85.0);
        assert!(budget.delete_transaction(&orphan.id).await?);
        assert_eq!(budget.get_bucket("2").await.unwrap().balance, 85.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_summary_overwrites_without_recalculating() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;

        budget
            .update_summary(SummaryPatch {
                available_to_spend: Some(0.0),
                ..SummaryPatch::default()
            })
            .await?;

        assert_eq!(budget.get_summary().await.available_to_spend, 0.0);
        assert!(budget.summary_drift().await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_removes_everything() -> Result<()> {
        let (store, budget) = setup_scenario_budget().await?;
        budget
            .create_transaction(new_transaction("Rent", 10.0))
            .await?;

        budget.reset().await?;

        assert_eq!(snapshot(&store).await?, vec![None, None, None]);
        assert!(budget.list_buckets().await.is_empty());
        assert_eq!(budget.get_summary().await, Summary::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_reports_failed_keys() -> Result<()> {
        let (store, budget) = setup_scenario_budget().await?;
        store.fail_writes(DocumentKey::AppState)?;

        let result = budget.reset().await;

        assert!(matches!(result, Err(Error::Storage { ref key, .. }) if key == "appState"));
        assert!(budget.list_buckets().await.is_empty());
        assert!(store.get(DocumentKey::AppState).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_overview_splits_buckets() -> Result<()> {
        let (_, budget) = setup_scenario_budget().await?;
        budget
            .create_transaction(new_transaction("Rent", 10.0))
            .await?;

        let overview = budget.overview(5).await;

        assert_eq!(overview.summary.total_balance, 685.0);
        assert_eq!(overview.safe.len(), 1);
        assert_eq!(overview.discretionary.len(), 1);
        assert_eq!(overview.recent.len(), 1);
        Ok(())
    }
}
