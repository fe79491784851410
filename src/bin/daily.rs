use chrono::{Local, NaiveDate};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use historylog::{
    config::Config,
    daily::{DailyJob, Mode}
};

#[derive(Parser)]
#[command(name = "historylog")]
#[command(about = "Ask the local model a history question, log it and push", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Mode::Chain)]
    mode: Mode,

    /// Number of passes to run back to back.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Date to log under, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Commit without pushing.
    #[arg(long)]
    no_push: bool,

    /// Env file to load instead of historylog.env.
    #[arg(long)]
    env_file: Option<PathBuf>
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match Config::from_env(cli.env_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let job = match DailyJob::from_config(config, !cli.no_push) {
        Ok(job) => job,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    for run in 1..=cli.runs {
        info!("run {}/{} ({:?}, {})", run, cli.runs, cli.mode, date);
        let report = job.run(cli.mode, date).await;
        info!("saved: {}, committed: {}", report.saved, report.committed);
    }
    ExitCode::SUCCESS
}
