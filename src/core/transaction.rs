//! Transaction business logic - records ledger events and keeps balances in step.
//!
//! Creating a transaction stores it first and then applies its amount to the
//! bucket with the same name; deleting one applies the negated amount first and
//! then removes the record. Both steps finish before the call returns, so a
//! read that follows sees the new balances and summary.
//!
//! The steps are separate writes. If the second one fails the first is not
//! rolled back: a created transaction stays recorded without its balance
//! effect, and a failed reversal leaves the transaction in place.

use crate::{
    core::{balance::BalanceEngine, ids::IdGenerator},
    errors::{Error, Result},
    models::{NewTransaction, Transaction},
    store::{DocumentKey, DocumentStore, load_json, read_json, write_json},
};
use tracing::{debug, info, instrument, warn};

/// CRUD over the transaction collection.
#[derive(Debug)]
pub struct TransactionRepository<S> {
    store: S,
    balances: BalanceEngine<S>,
    ids: IdGenerator,
}

impl<S: DocumentStore + Clone> TransactionRepository<S> {
    /// Creates a repository over `store`.
    pub fn new(store: S) -> Self {
        Self {
            balances: BalanceEngine::new(store.clone()),
            store,
            ids: IdGenerator::new(),
        }
    }

    /// Returns every transaction in stored order, timestamps decoded.
    ///
    /// An absent or undecodable document yields an empty list.
    pub async fn list(&self) -> Vec<Transaction> {
        let transactions: Vec<Transaction> = read_json(&self.store, DocumentKey::Transactions)
            .await
            .unwrap_or_default();
        debug!("Fetched {} transactions.", transactions.len());
        transactions
    }

    /// Like [`Self::list`], but fails when the store cannot be read.
    pub async fn load(&self) -> Result<Vec<Transaction>> {
        let transactions: Option<Vec<Transaction>> =
            load_json(&self.store, DocumentKey::Transactions).await?;
        Ok(transactions.unwrap_or_default())
    }

    /// Finds a transaction by id.
    pub async fn find_by_id(&self, id: &str) -> Option<Transaction> {
        self.list().await.into_iter().find(|transaction| transaction.id == id)
    }

    /// Records a transaction and applies its amount to the named bucket.
    ///
    /// A bucket name that matches nothing is not an error: the transaction is
    /// still recorded and no balance changes.
    #[instrument(skip(self))]
    pub async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        validate_amount(new_transaction.amount)?;

        let mut transactions = self.load().await?;
        let id = self
            .ids
            .next_id(transactions.iter().map(|transaction| transaction.id.as_str()));
        let transaction = new_transaction.into_transaction(id);

        transactions.push(transaction.clone());
        write_json(&self.store, DocumentKey::Transactions, &transactions).await?;
        info!(
            "Created transaction ID {} for bucket '{}': amount = {}, credit card = {}",
            transaction.id, transaction.bucket_name, transaction.amount, transaction.is_credit_card
        );

        if self
            .balances
            .apply_to_bucket(&transaction.bucket_name, transaction.amount)
            .await?
            .is_none()
        {
            warn!(
                "Transaction ID {} recorded without a balance change: no bucket named '{}'",
                transaction.id, transaction.bucket_name
            );
        }

        Ok(transaction)
    }

    /// Reverses a transaction's balance effect and removes it.
    ///
    /// Returns `false`, without writing anything, when no transaction has that id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut transactions = self.load().await?;
        let Some(position) = transactions.iter().position(|transaction| transaction.id == id)
        else {
            info!("No transaction with ID {} to delete.", id);
            return Ok(false);
        };

        let transaction = transactions.remove(position);
        self.balances
            .apply_to_bucket(&transaction.bucket_name, -transaction.amount)
            .await?;

        write_json(&self.store, DocumentKey::Transactions, &transactions).await?;
        info!(
            "Deleted transaction ID {} ({} reversed on '{}')",
            transaction.id, transaction.amount, transaction.bucket_name
        );
        Ok(true)
    }

    /// Number of transactions that reference `bucket_name`.
    pub async fn count_for_bucket(&self, bucket_name: &str) -> usize {
        self.list()
            .await
            .iter()
            .filter(|transaction| transaction.bucket_name == bucket_name)
            .count()
    }
}

/// Rejects amounts that cannot move a balance meaningfully.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount == 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}
