//! Identifier assignment for new buckets and transactions.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out ids derived from the wall clock in milliseconds.
///
/// Ids are strictly increasing for one generator even when several are
/// requested within the same millisecond, and never repeat an id already
/// present in the collection they are added to.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// Creates a generator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id not contained in `existing`.
    pub fn next_id<'a, I>(&self, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let taken: HashSet<&str> = existing.into_iter().collect();

        let mut candidate = Utc::now()
            .timestamp_millis()
            .max(self.last.load(Ordering::Relaxed).saturating_add(1));
        while taken.contains(candidate.to_string().as_str()) {
            candidate = candidate.saturating_add(1);
        }

        self.last.fetch_max(candidate, Ordering::Relaxed);
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_in_a_burst() {
        let ids = IdGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            assert!(seen.insert(ids.next_id(std::iter::empty())));
        }
    }

    #[test]
    fn test_ids_increase() {
        let ids = IdGenerator::new();
        let first: i64 = ids.next_id(std::iter::empty()).parse().unwrap_or_default();
        let second: i64 = ids.next_id(std::iter::empty()).parse().unwrap_or_default();
        assert!(second > first);
    }

    #[test]
    fn test_skips_existing_ids() {
        let ids = IdGenerator::new();
        let now = Utc::now().timestamp_millis();
        let taken: Vec<String> = (now..now + 50).map(|n| n.to_string()).collect();

        let id = ids.next_id(taken.iter().map(String::as_str));
        assert!(!taken.contains(&id));
    }
}
