use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Args;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/finance_tracker.toml";
const ENV_PREFIX: &str = "FINANCE_TRACKER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `tracing` level for this binary and the engine.
    pub level: String,
    pub database_url: String,
    /// JSON file of the pre-database version.
    pub legacy_store: PathBuf,
    /// IANA name used for month boundaries and typed dates.
    pub timezone: String,
    /// Where exported reports go; the user's download folder when unset.
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            database_url: "sqlite:./finance.db?mode=rwc".to_string(),
            legacy_store: PathBuf::from("./legacy_prefs.json"),
            timezone: "UTC".to_string(),
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::TimeZone(self.timezone.clone()))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Flags that override the config file and the environment.
#[derive(Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the database URL (e.g. sqlite:./finance.db?mode=rwc).
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Override the legacy preferences file.
    #[arg(long, global = true)]
    pub legacy_store: Option<PathBuf>,
    /// Override the time zone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override the log level.
    #[arg(long, global = true)]
    pub level: Option<String>,
}

/// Config file, then `FINANCE_TRACKER_*` variables, then command-line flags.
pub fn load(overrides: &ConfigOverrides) -> Result<AppConfig> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(database_url) = &overrides.database_url {
        settings.database_url = database_url.clone();
    }
    if let Some(legacy_store) = &overrides.legacy_store {
        settings.legacy_store = legacy_store.clone();
    }
    if let Some(timezone) = &overrides.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(level) = &overrides.level {
        settings.level = level.clone();
    }

    Ok(settings)
}
