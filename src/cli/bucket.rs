//! Bucket commands - `buckets`, `add-bucket`, `edit-bucket`, `remove-bucket`.
//!
//! Bucket writes do not touch the summary on their own, so every command that
//! can change a balance rebuilds it afterwards.

use bucketbook::{
    Budget, Error, Result,
    core::report::{BucketProgress, format_currency, format_progress_bar},
    models::{BucketKind, NewBucket},
    store::DocumentStore,
};

/// Fields to change on an existing bucket; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct BucketEdit {
    pub name: Option<String>,
    pub kind: Option<BucketKind>,
    pub target: Option<f64>,
    pub balance: Option<f64>,
}

pub fn print_bucket(progress: &BucketProgress) {
    let bucket = &progress.bucket;
    println!(
        "  [{}] {} ({}) {} of {}  {}",
        bucket.id,
        bucket.name,
        bucket.kind,
        format_currency(bucket.balance),
        format_currency(bucket.target),
        format_progress_bar(progress.percentage, None)
    );
}

pub async fn list<S: DocumentStore + Clone>(budget: &Budget<S>) -> Result<()> {
    let buckets = budget.list_buckets().await;
    if buckets.is_empty() {
        println!("No buckets yet. Create one with `add-bucket`.");
        return Ok(());
    }

    for bucket in buckets {
        print_bucket(&BucketProgress::new(bucket));
    }
    Ok(())
}

pub async fn add<S: DocumentStore + Clone>(
    budget: &Budget<S>,
    name: String,
    kind: BucketKind,
    target: f64,
    balance: f64,
) -> Result<()> {
    let bucket = budget
        .create_bucket(NewBucket {
            name,
            kind,
            target,
            balance,
        })
        .await?;
    budget.rebuild_summary().await?;

    println!("✅ Created bucket '{}' with ID {}.", bucket.name, bucket.id);
    Ok(())
}

pub async fn edit<S: DocumentStore + Clone>(
    budget: &Budget<S>,
    id: &str,
    edit: BucketEdit,
) -> Result<()> {
    let Some(mut bucket) = budget.get_bucket(id).await else {
        return Err(Error::Validation {
            message: format!("No bucket with ID {id}. Use `buckets` to see them."),
        });
    };

    if let Some(name) = edit.name {
        bucket.name = name;
    }
    if let Some(kind) = edit.kind {
        bucket.kind = kind;
    }
    if let Some(target) = edit.target {
        bucket.target = target;
    }
    if let Some(balance) = edit.balance {
        bucket.balance = balance;
    }

    budget.update_bucket(bucket).await?;
    budget.rebuild_summary().await?;

    println!("✅ Bucket {id} updated.");
    Ok(())
}

pub async fn remove<S: DocumentStore + Clone>(budget: &Budget<S>, id: &str) -> Result<()> {
    if budget.delete_bucket(id).await? {
        budget.rebuild_summary().await?;
        println!("✅ Bucket {id} removed.");
    } else {
        println!("Nothing to remove: no bucket with ID {id}.");
    }
    Ok(())
}
