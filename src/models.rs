//! Domain documents - buckets, transactions, and the derived summary.
//!
//! These types are stored as JSON documents and keep the field names of the
//! on-disk format (`type`, `bucketName`, `isCreditCard`, `totalBalance`, ...),
//! so data written by earlier versions of the app still decodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending class of a bucket; drives the available-to-spend aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    /// Essential or fixed spending (rent, utilities)
    Safe,
    /// Flexible spending; balances count toward available-to-spend
    Discretionary,
}

impl BucketKind {
    /// The lowercase name used on disk and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Discretionary => "discretionary",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "discretionary" => Ok(Self::Discretionary),
            other => Err(format!(
                "unknown bucket type '{other}' (expected 'safe' or 'discretionary')"
            )),
        }
    }
}

/// A named budget category with a goal amount and a current balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Unique identifier, assigned at creation
    pub id: String,
    /// Display name; transactions refer to buckets by this name
    pub name: String,
    /// Safe or discretionary
    #[serde(rename = "type")]
    pub kind: BucketKind,
    /// Goal amount
    pub target: f64,
    /// Current amount; may go negative or exceed the target
    pub balance: f64,
}

/// A bucket that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBucket {
    /// Display name
    pub name: String,
    /// Safe or discretionary
    pub kind: BucketKind,
    /// Goal amount
    pub target: f64,
    /// Opening balance
    pub balance: f64,
}

impl NewBucket {
    pub(crate) fn into_bucket(self, id: String) -> Bucket {
        Bucket {
            id,
            name: self.name,
            kind: self.kind,
            target: self.target,
            balance: self.balance,
        }
    }
}

/// A single ledger event against a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, assigned at creation
    pub id: String,
    /// Added to the bucket balance (negative for spending)
    pub amount: f64,
    /// Name of the bucket this transaction applies to
    pub bucket_name: String,
    /// Paid by credit card; informational only
    pub is_credit_card: bool,
    /// When the transaction happened, ISO-8601 on disk
    pub timestamp: DateTime<Utc>,
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Added to the bucket balance (negative for spending)
    pub amount: f64,
    /// Name of the bucket to apply the amount to
    pub bucket_name: String,
    /// Paid by credit card
    pub is_credit_card: bool,
    /// When the transaction happened
    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    /// A transaction timestamped now.
    #[must_use]
    pub fn now(bucket_name: impl Into<String>, amount: f64, is_credit_card: bool) -> Self {
        Self {
            amount,
            bucket_name: bucket_name.into(),
            is_credit_card,
            timestamp: Utc::now(),
        }
    }

    /// Money added to a bucket, timestamped now. `amount` is stored as given.
    #[must_use]
    pub fn deposit(bucket_name: impl Into<String>, amount: f64, is_credit_card: bool) -> Self {
        Self::now(bucket_name, amount, is_credit_card)
    }

    /// Money spent from a bucket, timestamped now.
    ///
    /// `amount` is what the user entered, a positive number; the stored amount
    /// is its negation so that applying it lowers the balance.
    #[must_use]
    pub fn spend(bucket_name: impl Into<String>, amount: f64, is_credit_card: bool) -> Self {
        Self::now(bucket_name, -amount, is_credit_card)
    }

    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            bucket_name: self.bucket_name,
            is_credit_card: self.is_credit_card,
            timestamp: self.timestamp,
        }
    }
}

/// Totals derived from the bucket collection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of every bucket balance
    pub total_balance: f64,
    /// Sum of discretionary bucket balances
    pub available_to_spend: f64,
}

/// Partial overwrite of the stored summary; `None` fields keep their value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryPatch {
    /// New total balance
    pub total_balance: Option<f64>,
    /// New available-to-spend
    pub available_to_spend: Option<f64>,
}

impl Summary {
    /// Applies `patch` on top of this summary.
    #[must_use]
    pub fn patched(self, patch: SummaryPatch) -> Self {
        Self {
            total_balance: patch.total_balance.unwrap_or(self.total_balance),
            available_to_spend: patch.available_to_spend.unwrap_or(self.available_to_spend),
        }
    }
}
