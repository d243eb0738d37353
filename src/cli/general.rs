//! General commands - `overview`, `summary`, `check`, and `reset`.

use super::bucket::print_bucket;
use bucketbook::{
    Budget, Result,
    core::report::{format_currency, format_transaction_summary},
    store::DocumentStore,
};
use chrono::Local;
use std::io::{self, BufRead, Write};

pub async fn overview<S: DocumentStore + Clone>(budget: &Budget<S>, recent: usize) -> Result<()> {
    let overview = budget.overview(recent).await;

    println!(
        "Available to spend: {}",
        format_currency(overview.summary.available_to_spend)
    );
    println!(
        "Total balance:      {}",
        format_currency(overview.summary.total_balance)
    );

    println!("\nSafe buckets");
    overview.safe.iter().for_each(print_bucket);
    println!("\nDiscretionary buckets");
    overview.discretionary.iter().for_each(print_bucket);

    println!("\nRecent transactions");
    if overview.recent.is_empty() {
        println!("  none");
    }
    for transaction in &overview.recent {
        println!(
            "  [{}] {}",
            transaction.id,
            format_transaction_summary(transaction, &Local)
        );
    }
    Ok(())
}

pub async fn summary<S: DocumentStore + Clone>(budget: &Budget<S>) -> Result<()> {
    let summary = budget.get_summary().await;
    println!("Total balance:      {}", format_currency(summary.total_balance));
    println!(
        "Available to spend: {}",
        format_currency(summary.available_to_spend)
    );
    Ok(())
}

pub async fn check<S: DocumentStore + Clone>(budget: &Budget<S>, fix: bool) -> Result<()> {
    let Some(drift) = budget.summary_drift().await else {
        println!("✅ Summary matches the bucket balances.");
        return Ok(());
    };

    match drift.stored {
        Some(stored) => println!(
            "⚠️ Stored summary ({} / {}) differs from buckets ({} / {}).",
            format_currency(stored.total_balance),
            format_currency(stored.available_to_spend),
            format_currency(drift.derived.total_balance),
            format_currency(drift.derived.available_to_spend)
        ),
        None => println!("⚠️ No stored summary."),
    }

    if fix {
        budget.rebuild_summary().await?;
        println!("✅ Summary rebuilt.");
    }
    Ok(())
}

pub async fn reset<S: DocumentStore + Clone>(budget: &Budget<S>, yes: bool) -> Result<()> {
    if !yes {
        print!("Reset all app data? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    budget.reset().await?;
    println!("✅ All data removed. Defaults are restored on the next run.");
    Ok(())
}
