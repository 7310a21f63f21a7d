mod input;

use anyhow::Context;
use chrono::TimeDelta;
use clap::{ArgAction, Parser, ValueEnum};
use foreman::{
    classify, resolve_targets, ReportStore, SqliteReportStore, Summary, UnknownHostPolicy,
};
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FOREMAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let summary = summarize(&cli)?;

    match cli.format {
        Format::Text => print!("{summary}"),
        Format::Json => println!("{}", serde_json::to_string(&summary)?),
    }
    Ok(())
}

fn summarize(cli: &Cli) -> anyhow::Result<Summary> {
    let filter = cli
        .hosts_file
        .as_deref()
        .map(input::read_hosts_file)
        .transpose()?
        .filter(|hosts| !hosts.is_empty());
    let window = TimeDelta::from_std(cli.duration)
        .with_context(|| format!("duration {:?} is too long", cli.duration))?;

    info!("Opening report store {}", cli.database.display());
    let store = SqliteReportStore::open(&cli.database)?;
    let registry = store.hosts()?;

    let policy = if cli.strict {
        UnknownHostPolicy::Reject
    } else {
        UnknownHostPolicy::Missing
    };
    let targets = resolve_targets(&registry, filter.as_deref(), policy)?;
    let windows = store.fetch_window(window)?;

    let summary = classify(&windows, targets);
    info!(
        missing = summary.missing.len(),
        error = summary.error.len(),
        good = summary.good.len(),
        "classified hosts"
    );
    Ok(summary)
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about, disable_version_flag = true)]
struct Cli {
    /// Print the version number
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// SQLite database holding the hosts and reports tables
    #[arg(short, long, env = "FOREMAN_DATABASE", default_value = "foreman.db")]
    database: PathBuf,

    /// Window to summarize, like 15m, 1.5h, 2h45m (s for seconds, m for minutes, h for hours)
    #[arg(short = 't', long, env = "FOREMAN_DURATION", default_value = "1h", value_parser = input::parse_duration)]
    duration: Duration,

    /// File containing the hosts to summarize, one per line
    #[arg(short = 'f', long, env = "FOREMAN_HOSTS_FILE")]
    hosts_file: Option<PathBuf>,

    /// Fail on hosts in the hosts file that are not registered
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}
