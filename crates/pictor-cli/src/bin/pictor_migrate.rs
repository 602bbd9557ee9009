use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pictor_cli::{init_tracing, load_migrator, run_migrations};
use pictor_core::Config;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser, Debug)]
#[command(name = "pictor-migrate")]
#[command(about = "Apply pending database migrations")]
struct Args {
    /// Directory holding the migration scripts
    #[arg(long, value_name = "DIR", default_value = "migrations")]
    migrations_path: PathBuf,

    /// Database URL (defaults to DATABASE_URL or the DB_* settings)
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::from_env()?;
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database_url().to_string());

    let migrator = load_migrator(&args.migrations_path).await?;
    tracing::info!(
        path = %args.migrations_path.display(),
        known = migrator.iter().count(),
        "Loaded migrations"
    );

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool, &migrator).await?;
    pool.close().await;

    Ok(())
}
