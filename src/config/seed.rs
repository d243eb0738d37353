//! Seed data loading from TOML.
//!
//! The buckets and transactions defined here are written on first run, when
//! the corresponding document does not exist yet. The built-in dataset is the
//! crate's `config.toml`, embedded at compile time.

use crate::errors::{Error, Result};
use crate::models::{Bucket, BucketKind, Transaction};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::path::Path;

const BUILTIN_SEED: &str = include_str!("../../config.toml");

/// The whole seed file
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Starter buckets
    pub buckets: Vec<SeedBucket>,
    /// Backdated sample transactions
    #[serde(default)]
    pub transactions: Vec<SeedTransaction>,
}

/// A starter bucket
#[derive(Debug, Deserialize, Clone)]
pub struct SeedBucket {
    /// Bucket id
    pub id: String,
    /// Bucket name
    pub name: String,
    /// `safe` or `discretionary`
    #[serde(rename = "type")]
    pub kind: BucketKind,
    /// Goal amount
    pub target: f64,
    /// Starting balance
    pub balance: f64,
}

/// A sample transaction, dated relative to first run
#[derive(Debug, Deserialize, Clone)]
pub struct SeedTransaction {
    /// Transaction id
    pub id: String,
    /// Amount already reflected in the seeded bucket balance
    pub amount: f64,
    /// Bucket the transaction belongs to
    pub bucket_name: String,
    /// Paid by credit card
    #[serde(default)]
    pub is_credit_card: bool,
    /// How many days before first run it happened
    #[serde(default)]
    pub days_ago: i64,
}

impl SeedConfig {
    /// The dataset shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SEED)
    }

    /// Parses seed TOML.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse seed data: {e}"),
        })
    }

    /// Loads seed TOML from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        tracing::debug!("Attempting to load seed data from: {:?}", path_ref);
        let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
            message: format!("Failed to read seed file {}: {e}", path_ref.display()),
        })?;
        Self::parse(&contents)
    }

    /// Loads `path` when given, otherwise the built-in dataset.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::builtin, Self::load)
    }

    /// The seeded buckets.
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket> {
        self.buckets
            .iter()
            .map(|seed| Bucket {
                id: seed.id.clone(),
                name: seed.name.clone(),
                kind: seed.kind,
                target: seed.target,
                balance: seed.balance,
            })
            .collect()
    }

    /// The seeded transactions, timestamped `days_ago` days before `now`.
    ///
    /// A `days_ago` that lands outside the representable date range is a
    /// configuration error.
    pub fn transactions(&self, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        self.transactions
            .iter()
            .map(|seed| -> Result<Transaction> {
                let timestamp = Duration::try_days(seed.days_ago)
                    .and_then(|offset| now.checked_sub_signed(offset))
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Seed transaction {} has an out-of-range days_ago: {}",
                            seed.id, seed.days_ago
                        ),
                    })?;

                Ok(Transaction {
                    id: seed.id.clone(),
                    amount: seed.amount,
                    bucket_name: seed.bucket_name.clone(),
                    is_credit_card: seed.is_credit_card,
                    timestamp,
                })
            })
            .collect()
    }
}
