mod cli;

use bucketbook::{
    Budget, Result,
    config::{AppConfig, database, seed::SeedConfig},
    store::SqliteStore,
};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Parse arguments and settings
    let args = cli::Cli::parse();
    let mut app_config = AppConfig::from_env();
    if let Some(url) = args.database.clone() {
        app_config.database_url = url;
    }

    // 4. Open the document store
    database::prepare_sqlite_path(&app_config.database_url)?;
    let store = SqliteStore::connect(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    let budget = Budget::new(store);

    // 5. Seed first-run data
    let seed = SeedConfig::load_or_builtin(app_config.seed_path.as_deref())
        .inspect_err(|e| error!("Failed to load seed data: {}", e))?;
    budget
        .initialize(&seed)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    // 6. Run the command
    cli::run(args.command, &budget).await
}
