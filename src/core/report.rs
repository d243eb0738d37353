//! Report generation - progress, formatting, and grouping for display.
//!
//! Everything here is pure. The functions shape buckets and transactions
//! into what a screen shows, but they never read from or write to a store.

use crate::models::{Bucket, BucketKind, Summary, Transaction};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;

/// How far a bucket is toward its target, in four display bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// Below 25%
    Low,
    /// 25% up to 50%
    Building,
    /// 50% up to 75%
    OnTrack,
    /// 75% and above
    Funded,
}

impl ProgressBand {
    /// Band for a percentage as returned by [`calculate_percentage`].
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 25.0 {
            Self::Low
        } else if percentage < 50.0 {
            Self::Building
        } else if percentage < 75.0 {
            Self::OnTrack
        } else {
            Self::Funded
        }
    }
}

/// A bucket with its progress toward the target.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketProgress {
    /// The bucket
    pub bucket: Bucket,
    /// Percentage of the target reached, capped at 100
    pub percentage: f64,
    /// Display band for `percentage`
    pub band: ProgressBand,
}

impl BucketProgress {
    /// Progress for `bucket`.
    #[must_use]
    pub fn new(bucket: Bucket) -> Self {
        let percentage = calculate_percentage(bucket.balance, bucket.target);
        Self {
            bucket,
            percentage,
            band: ProgressBand::from_percentage(percentage),
        }
    }
}

/// The home screen: totals, buckets by kind, and the latest transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// Total balance and available-to-spend
    pub summary: Summary,
    /// Safe buckets in stored order
    pub safe: Vec<BucketProgress>,
    /// Discretionary buckets in stored order
    pub discretionary: Vec<BucketProgress>,
    /// Newest transactions first
    pub recent: Vec<Transaction>,
}

/// Transactions that happened on the same calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// The day, in the time zone used for grouping
    pub date: NaiveDate,
    /// Newest first
    pub transactions: Vec<Transaction>,
}

/// Builds the [`Overview`] from already loaded data.
#[must_use]
pub fn build_overview(
    summary: Summary,
    buckets: &[Bucket],
    mut transactions: Vec<Transaction>,
    recent_limit: usize,
) -> Overview {
    let (safe, discretionary): (Vec<_>, Vec<_>) = buckets
        .iter()
        .cloned()
        .map(BucketProgress::new)
        .partition(|progress| progress.bucket.kind == BucketKind::Safe);

    sort_newest_first(&mut transactions);
    transactions.truncate(recent_limit);

    Overview {
        summary,
        safe,
        discretionary,
        recent: transactions,
    }
}

/// Percentage of `target` that `current` represents, capped at 100.
///
/// A zero target reports 0%. Negative balances give negative percentages.
#[must_use]
pub fn calculate_percentage(current: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }

    ((current / target) * 100.0).min(100.0)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
#[must_use]
pub fn format_progress_bar(percentage: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percentage.clamp(0.0, 100.0);

    // clamped is in [0, 100] and length is small, so the product fits in usize.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percentage:.0}%", "█".repeat(filled), "░".repeat(empty))
}

/// Formats an amount as US dollars with thousands separators, e.g. `$1,234.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Formats a transaction amount with an explicit sign, e.g. `+$50.00` or `-$25.50`.
#[must_use]
pub fn format_transaction_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { '-' } else { '+' };
    format!("{sign}{}", format_currency(amount.abs()))
}

/// `Mar 5, 2024`
#[must_use]
pub fn format_date<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%b %-d, %Y").to_string()
}

/// `06:30 PM`
#[must_use]
pub fn format_time<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%I:%M %p").to_string()
}

/// `Mar 5, 2024 at 06:30 PM`
#[must_use]
pub fn format_date_time<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{} at {}", format_date(timestamp), format_time(timestamp))
}

/// One line per transaction: amount, bucket, payment method, and time.
#[must_use]
pub fn format_transaction_summary<Tz>(transaction: &Transaction, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let amount = format_transaction_amount(transaction.amount);
    let method = if transaction.is_credit_card { "credit card" } else { "cash" };
    let when = format_date_time(&transaction.timestamp.with_timezone(zone));

    format!("{amount} | {} | {method} | {when}", transaction.bucket_name)
}

/// Groups transactions by calendar day in `zone`, newest day first and newest
/// transaction first within each day.
#[must_use]
pub fn group_by_day<Tz: TimeZone>(mut transactions: Vec<Transaction>, zone: &Tz) -> Vec<DayGroup> {
    sort_newest_first(&mut transactions);

    let mut groups: Vec<DayGroup> = Vec::new();
    for transaction in transactions {
        let date = transaction.timestamp.with_timezone(zone).date_naive();
        if let Some(group) = groups.last_mut().filter(|group| group.date == date) {
            group.transactions.push(transaction);
        } else {
            groups.push(DayGroup {
                date,
                transactions: vec![transaction],
            });
        }
    }
    groups
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{FixedOffset, Utc};

    fn transaction_at(id: &str, rfc3339: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: 10.0,
            bucket_name: "Dining".to_string(),
            is_credit_card: false,
            timestamp: DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_calculate_percentage() {
        assert_eq!(calculate_percentage(600.0, 1200.0), 50.0);
        assert_eq!(calculate_percentage(150.0, 100.0), 100.0);
        assert_eq!(calculate_percentage(50.0, 0.0), 0.0);
        assert_eq!(calculate_percentage(-25.0, 100.0), -25.0);
    }

    #[test]
    fn test_progress_bands() {
        assert_eq!(ProgressBand::from_percentage(-5.0), ProgressBand::Low);
        assert_eq!(ProgressBand::from_percentage(24.9), ProgressBand::Low);
        assert_eq!(ProgressBand::from_percentage(25.0), ProgressBand::Building);
        assert_eq!(ProgressBand::from_percentage(50.0), ProgressBand::OnTrack);
        assert_eq!(ProgressBand::from_percentage(75.0), ProgressBand::Funded);
        assert_eq!(ProgressBand::from_percentage(100.0), ProgressBand::Funded);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50%");
        assert_eq!(format_progress_bar(-25.0, Some(4)), "[░░░░] -25%");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(75.0), "$75.00");
        assert_eq!(format_currency(1025.5), "$1,025.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-600.0), "-$600.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_transaction_amount() {
        assert_eq!(format_transaction_amount(50.0), "+$50.00");
        assert_eq!(format_transaction_amount(-1250.5), "-$1,250.50");
    }

    #[test]
    fn test_format_date_time() {
        let timestamp = transaction_at("1", "2024-03-05T18:30:00Z").timestamp;
        assert_eq!(format_date(&timestamp), "Mar 5, 2024");
        assert_eq!(format_time(&timestamp), "06:30 PM");
        assert_eq!(format_date_time(&timestamp), "Mar 5, 2024 at 06:30 PM");
    }

    #[test]
    fn test_group_by_day_newest_first() {
        let transactions = vec![
            transaction_at("a", "2024-03-04T09:00:00Z"),
            transaction_at("b", "2024-03-05T08:00:00Z"),
            transaction_at("c", "2024-03-05T20:00:00Z"),
        ];

        let groups = group_by_day(transactions, &Utc);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date.to_string(), "2024-03-05");
        let ids: Vec<_> = groups[0].transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "b"]);
        assert_eq!(groups[1].transactions[0].id, "a");
    }

    #[test]
    fn test_group_by_day_uses_zone() {
        let transactions = vec![
            transaction_at("late", "2024-03-05T23:30:00Z"),
            transaction_at("early", "2024-03-05T01:00:00Z"),
        ];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        let groups = group_by_day(transactions, &tokyo);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date.to_string(), "2024-03-06");
    }

    #[test]
    fn test_build_overview() {
        let transactions = vec![
            transaction_at("old", "2024-01-01T00:00:00Z"),
            transaction_at("new", "2024-02-01T00:00:00Z"),
            transaction_at("mid", "2024-01-15T00:00:00Z"),
        ];

        let overview = build_overview(Summary::default(), &scenario_buckets(), transactions, 2);

        assert_eq!(overview.safe[0].bucket.name, "Rent");
        assert_eq!(overview.safe[0].percentage, 50.0);
        assert_eq!(overview.safe[0].band, ProgressBand::OnTrack);
        assert_eq!(overview.discretionary[0].band, ProgressBand::Funded);
        let ids: Vec<_> = overview.recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid"]);
    }
}
