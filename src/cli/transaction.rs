//! Transaction commands - `add-funds`, `spend`, `remove-transaction`, `transactions`.

use bucketbook::{
    Budget, Error, Result,
    core::report::{format_transaction_summary, group_by_day},
    models::NewTransaction,
    store::DocumentStore,
};
use chrono::Local;

/// Whether money goes into or out of the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Funds added
    In,
    /// Spending
    Out,
}

pub async fn list<S: DocumentStore + Clone>(budget: &Budget<S>) -> Result<()> {
    let transactions = budget.list_transactions().await;
    if transactions.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    for group in group_by_day(transactions, &Local) {
        println!("{}", group.date.format("%b %-d, %Y"));
        for transaction in &group.transactions {
            println!(
                "  [{}] {}",
                transaction.id,
                format_transaction_summary(transaction, &Local)
            );
        }
    }
    Ok(())
}

/// Records `amount` (entered as a positive number) against `bucket`.
pub async fn record<S: DocumentStore + Clone>(
    budget: &Budget<S>,
    bucket: String,
    amount: f64,
    credit_card: bool,
    flow: Flow,
) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation {
            message: "Please enter a valid amount greater than zero".to_string(),
        });
    }
    if bucket.trim().is_empty() {
        return Err(Error::Validation {
            message: "Please choose a bucket".to_string(),
        });
    }

    let known = budget
        .list_buckets()
        .await
        .iter()
        .any(|existing| existing.name == bucket);

    let new_transaction = match flow {
        Flow::In => NewTransaction::deposit(bucket, amount, credit_card),
        Flow::Out => NewTransaction::spend(bucket, amount, credit_card),
    };
    let transaction = budget.create_transaction(new_transaction).await?;

    println!(
        "✅ Recorded [{}] {}",
        transaction.id,
        format_transaction_summary(&transaction, &Local)
    );
    if !known {
        println!(
            "⚠️ No bucket named '{}'; no balance was changed.",
            transaction.bucket_name
        );
    }
    Ok(())
}

pub async fn remove<S: DocumentStore + Clone>(budget: &Budget<S>, id: &str) -> Result<()> {
    if budget.delete_transaction(id).await? {
        println!("✅ Transaction {id} removed and its amount reversed.");
    } else {
        println!("Nothing to remove: no transaction with ID {id}.");
    }
    Ok(())
}
