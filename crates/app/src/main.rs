use clap::Parser;
use engine::{Engine, LegacyStore};
use migration::{Migrator, MigratorTrait};

use crate::{cli::Command, error::Result, settings::AppConfig};

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let config = settings::load(&cli.overrides)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finance_tracker={level},engine={level}",
            level = config.level
        ))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command, &config).await {
        tracing::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let db = connect_database(&config.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .time_zone(config.time_zone()?)
        .build()
        .await?;

    let mut legacy = LegacyStore::open(&config.legacy_store)?;
    // The legacy commands work on the old file itself.
    if !matches!(command, Command::Legacy(_)) {
        match engine.migrate_legacy(&mut legacy).await {
            Ok(report) if !report.is_noop() => tracing::info!(
                "moved {} of {} legacy transactions into the database",
                report.migrated,
                report.found
            ),
            Ok(_) => {}
            Err(err) => tracing::error!("legacy migration failed: {err}"),
        }
    }

    commands::run(&engine, config, &mut legacy, command).await
}

async fn connect_database(url: &str) -> Result<sea_orm::DatabaseConnection> {
    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
