mod config;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use dplogs_aws::{parse_target_date, LogFetcher};
use rusoto_core::Region;
use tracing_subscriber::EnvFilter;

use config::Settings;

/// Download logs of an AWS Data Pipeline.
#[derive(Debug, Parser)]
#[command(name = "dplogs", version, long_about = None)]
struct Cli {
    /// Name of the data pipeline you want to get logs of
    name: String,

    /// General S3 location for data pipeline logs (look for pipelineLogUri)
    #[arg(long, env = "DATAPIPELINE_LOGDIR")]
    logdir: String,

    /// AWS profile to use
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// AWS region to use
    #[arg(long, env = "AWS_REGION", value_parser = parse_region)]
    region: Option<Region>,

    /// Date in format YYYY-MM-DD. If not specified, newest logs are downloaded
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Directory to download the log files into
    #[arg(long, default_value = ".")]
    dest: PathBuf,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            name: cli.name,
            log_dir: cli.logdir,
            profile: cli.profile,
            region: cli.region,
            date: cli.date,
            dest: cli.dest,
        }
    }
}

fn parse_region(value: &str) -> Result<Region, String> {
    value.parse::<Region>().map_err(|e| e.to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_target_date(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let settings = Settings::from(Cli::parse());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dplogs=info,dplogs_aws=info".into()),
        )
        .finish();
    let _log = tracing::subscriber::set_default(subscriber);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let fetcher = LogFetcher::new_with_config(&settings.fetch_config()?)?;
        fetcher.fetch(&settings.fetch_request()).await?;
        Ok::<_, anyhow::Error>(())
    })
}
