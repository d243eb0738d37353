//! Core business logic - repositories, balance recalculation, and reporting.
//!
//! Nothing in here knows how data is displayed. Every type is generic over a
//! [`DocumentStore`](crate::store::DocumentStore) handed in at construction.

/// Balance application and summary recalculation
pub mod balance;
/// Bucket repository
pub mod bucket;
/// The facade used by the presentation layer
pub mod budget;
/// Identifier assignment
pub mod ids;
/// Display helpers: progress, formatting, grouping
pub mod report;
/// Transaction repository
pub mod transaction;

pub use balance::{BalanceEngine, summarize};
pub use bucket::BucketRepository;
pub use budget::{Budget, SummaryDrift};
pub use transaction::TransactionRepository;
