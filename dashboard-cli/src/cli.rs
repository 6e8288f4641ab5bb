use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, ConfigFile, Dashboard, OpenWeatherProvider, S3ObjectStore,
    config::{DEFAULT_BUCKET_PREFIX, DEFAULT_REGION},
};
use inquire::{Password, PasswordDisplayMode, Text};
use std::{process::ExitCode, sync::Arc};

/// Top-level CLI struct. Without a subcommand the dashboard runs once.
#[derive(Debug, Parser)]
#[command(
    name = "weather-dashboard",
    version,
    about = "Fetch current weather for a list of cities and store it in S3"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every configured city and persist the observations (default).
    Run,

    /// Store the API key, bucket prefix and region in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => run_dashboard().await,
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn run_dashboard() -> Result<ExitCode> {
    let config = Config::from_env()?;

    let store = Arc::new(S3ObjectStore::connect(&config.region).await);
    let provider = Arc::new(OpenWeatherProvider::new(config.api_key.clone()));
    let dashboard = Dashboard::new(&config, provider, store);

    let mut stdout = std::io::stdout().lock();
    let report = dashboard
        .run(&mut stdout)
        .await
        .context("Failed to write dashboard output")?;

    tracing::info!(
        saved = report.saved(),
        total = report.cities().len(),
        policy = ?config.exit_policy,
        "run finished"
    );

    Ok(ExitCode::from(report.exit_code(config.exit_policy)))
}

fn configure() -> Result<()> {
    let mut file = ConfigFile::load()?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !api_key.trim().is_empty() {
        file.api_key = Some(api_key.trim().to_string());
    }

    let prefix = Text::new("Bucket name prefix:")
        .with_default(file.bucket_prefix.as_deref().unwrap_or(DEFAULT_BUCKET_PREFIX))
        .prompt()?;
    file.bucket_prefix = Some(prefix);

    let region = Text::new("AWS region:")
        .with_default(file.region.as_deref().unwrap_or(DEFAULT_REGION))
        .prompt()?;
    file.region = Some(region);

    let path = file.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
