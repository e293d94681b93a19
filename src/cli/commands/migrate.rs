use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{AppConfig, StoreKind};
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.database.store != StoreKind::Postgres {
        anyhow::bail!("migrations only apply to the postgres store (STORE=postgres)");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to run migrations")?;

    output_success(output_format, "Migrations applied", None)
}
