use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Text};
use tracing::info;
use weather_core::{Config, Dispatcher, ReportKind};

use crate::server::McpServer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-mcp", version, about = "City weather tools over MCP stdio")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather tools over MCP on stdin/stdout.
    Serve,

    /// Run one weather operation and print the report.
    Query {
        /// Report kind.
        #[arg(value_enum)]
        kind: KindArg,

        /// City name, exactly as listed by `weather-mcp cities`.
        city: String,

        /// Evaluate "today" as this date (YYYY-MM-DD) instead of the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List supported cities.
    Cities,

    /// Interactively edit the provider settings and extra cities.
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Current,
    Forecast,
    Hourly,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Current => ReportKind::Current,
            KindArg::Forecast => ReportKind::Daily,
            KindArg::Hourly => ReportKind::Hourly,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                config.apply_env_overrides()?;
                serve(&config).await
            }
            Command::Query { kind, city, today } => {
                config.apply_env_overrides()?;
                query(&config, kind.into(), &city, today).await
            }
            Command::Cities => {
                for entry in config.city_table().entries() {
                    println!("{}\t{}", entry.display_name, entry.provider_id);
                }
                Ok(())
            }
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<weather_core::Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config)?;
    info!(
        endpoint = %config.provider.endpoint,
        cities = dispatcher.cities().len(),
        "启动天气查询MCP服务器..."
    );

    info!("MCP服务器已启动并等待连接");
    McpServer::new(dispatcher).serve_stdio().await?;

    info!("MCP服务器已停止");
    Ok(())
}

async fn query(
    config: &Config,
    kind: ReportKind,
    city: &str,
    today: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let mut dispatcher = Dispatcher::from_config(config)?;
    if let Some(date) = today {
        dispatcher = dispatcher.with_today(date);
    }

    let outcome = dispatcher.dispatch(kind, city).await;
    if outcome.is_error {
        anyhow::bail!(outcome.text);
    }

    println!("{}", outcome.text);
    Ok(())
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let endpoint = Text::new("Weather provider endpoint:")
        .with_default(&config.provider.endpoint)
        .prompt()
        .context("Failed to read endpoint")?;

    let timeout_secs = CustomType::<u64>::new("Request timeout in seconds (0 = none):")
        .with_default(config.provider.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.provider.endpoint = endpoint.trim().to_string();
    config.provider.timeout_secs = timeout_secs;

    while Confirm::new("Add a city?")
        .with_default(false)
        .prompt()
        .context("Failed to read answer")?
    {
        let name = Text::new("City name:").prompt().context("Failed to read city name")?;
        let id = Text::new("Provider city id:")
            .prompt()
            .context("Failed to read city id")?;

        let (name, id) = (name.trim().to_string(), id.trim().to_string());
        if name.is_empty() || id.is_empty() {
            println!("Skipped: name and id must both be non-empty.");
            continue;
        }
        config.upsert_city(name, id);
    }

    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };
    config.save_to(&path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
