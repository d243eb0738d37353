//! Command-line interface - the screens of the app as subcommands.
//!
//! Each subcommand calls into the [`Budget`] facade and prints the result,
//! re-reading whatever it displays after a write.

mod bucket;
mod general;
mod transaction;

use bucketbook::{Budget, Result, models::BucketKind, store::DocumentStore};
use clap::{Parser, Subcommand};

/// Bucket budgeting from the terminal
#[derive(Debug, Parser)]
#[command(name = "bucketbook", version, about)]
pub struct Cli {
    /// Database URL; overrides `DATABASE_URL`
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// What to do; shows the overview when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show totals, buckets, and recent transactions
    Overview {
        /// How many recent transactions to show
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },
    /// Show total balance and available-to-spend
    Summary,
    /// List every bucket with its progress
    Buckets,
    /// Create a bucket
    AddBucket {
        /// Display name
        name: String,
        /// `safe` or `discretionary`
        #[arg(long)]
        kind: BucketKind,
        /// Goal amount
        #[arg(long)]
        target: f64,
        /// Opening balance
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
    },
    /// Change fields of an existing bucket
    EditBucket {
        /// Bucket id
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New kind
        #[arg(long)]
        kind: Option<BucketKind>,
        /// New target
        #[arg(long)]
        target: Option<f64>,
        /// New balance
        #[arg(long)]
        balance: Option<f64>,
    },
    /// Delete a bucket
    RemoveBucket {
        /// Bucket id
        id: String,
    },
    /// List transactions grouped by day
    Transactions,
    /// Add money to a bucket
    AddFunds {
        /// Bucket name
        bucket: String,
        /// Positive amount to add
        amount: f64,
        /// Paid by credit card
        #[arg(long)]
        credit_card: bool,
    },
    /// Record spending from a bucket
    #[command(alias = "simulate")]
    Spend {
        /// Bucket name
        bucket: String,
        /// Positive amount spent
        amount: f64,
        /// Paid by credit card
        #[arg(long)]
        credit_card: bool,
    },
    /// Delete a transaction and reverse its effect
    RemoveTransaction {
        /// Transaction id
        id: String,
    },
    /// Compare the stored summary with the bucket balances
    Check {
        /// Rewrite the summary when it has drifted
        #[arg(long)]
        fix: bool,
    },
    /// Remove all data; defaults are restored on the next run
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Runs `command` against `budget`.
pub async fn run<S: DocumentStore + Clone>(
    command: Option<Command>,
    budget: &Budget<S>,
) -> Result<()> {
    match command.unwrap_or(Command::Overview { recent: 5 }) {
        Command::Overview { recent } => general::overview(budget, recent).await,
        Command::Summary => general::summary(budget).await,
        Command::Buckets => bucket::list(budget).await,
        Command::AddBucket {
            name,
            kind,
            target,
            balance,
        } => bucket::add(budget, name, kind, target, balance).await,
        Command::EditBucket {
            id,
            name,
            kind,
            target,
            balance,
        } => {
            let edit = bucket::BucketEdit {
                name,
                kind,
                target,
                balance,
            };
            bucket::edit(budget, &id, edit).await
        }
        Command::RemoveBucket { id } => bucket::remove(budget, &id).await,
        Command::Transactions => transaction::list(budget).await,
        Command::AddFunds {
            bucket,
            amount,
            credit_card,
        } => transaction::record(budget, bucket, amount, credit_card, transaction::Flow::In).await,
        Command::Spend {
            bucket,
            amount,
            credit_card,
        } => transaction::record(budget, bucket, amount, credit_card, transaction::Flow::Out).await,
        Command::RemoveTransaction { id } => transaction::remove(budget, &id).await,
        Command::Check { fix } => general::check(budget, fix).await,
        Command::Reset { yes } => general::reset(budget, yes).await,
    }
}
