//! Shared test utilities for bucketbook.
//!
//! This module provides helpers for setting up stores and budgets and for
//! building test buckets and transactions with sensible defaults.

use crate::{
    core::Budget,
    errors::Result,
    models::{Bucket, BucketKind, NewBucket, NewTransaction},
    store::{DocumentKey, MemoryStore, SqliteStore, write_json},
};

/// The two-bucket collection used throughout the tests:
/// Rent (safe, 600 of 1200) and Dining (discretionary, 75 of 100).
pub fn scenario_buckets() -> Vec<Bucket> {
    vec![
        Bucket {
            id: "1".to_string(),
            name: "Rent".to_string(),
            kind: BucketKind::Safe,
            target: 1200.0,
            balance: 600.0,
        },
        Bucket {
            id: "2".to_string(),
            name: "Dining".to_string(),
            kind: BucketKind::Discretionary,
            target: 100.0,
            balance: 75.0,
        },
    ]
}

/// Builds a bucket that has not been stored yet.
pub fn new_bucket(name: &str, kind: BucketKind, target: f64, balance: f64) -> NewBucket {
    NewBucket {
        name: name.to_string(),
        kind,
        target,
        balance,
    }
}

/// Builds a cash transaction timestamped now.
pub fn new_transaction(bucket_name: &str, amount: f64) -> NewTransaction {
    NewTransaction::now(bucket_name, amount, false)
}

/// An empty in-memory budget and a handle to its store.
pub fn setup_memory_budget() -> (MemoryStore, Budget<MemoryStore>) {
    let store = MemoryStore::new();
    (store.clone(), Budget::new(store))
}

/// An in-memory budget holding [`scenario_buckets`] and their summary.
pub async fn setup_scenario_budget() -> Result<(MemoryStore, Budget<MemoryStore>)> {
    let (store, budget) = setup_memory_budget();
    write_json(&store, DocumentKey::Buckets, &scenario_buckets()).await?;
    budget.rebuild_summary().await?;
    Ok((store, budget))
}

/// An empty budget over an in-memory `SQLite` database.
pub async fn setup_sqlite_budget() -> Result<Budget<SqliteStore>> {
    let store = SqliteStore::connect("sqlite::memory:").await?;
    Ok(Budget::new(store))
}
