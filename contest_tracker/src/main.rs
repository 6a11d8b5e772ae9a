mod cmd;
mod modules;

use crate::cmd::{
    fetch::{self, FetchArgs},
    server::{self, ServerArgs},
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "contest_tracker")]
#[command(about = "Competitive programming contest tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve contests once and print them as JSON
    Fetch(FetchArgs),
    /// Launch the API server
    Server(ServerArgs),
}

fn main() -> Result<()> {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .context("couldn't parse specified log level")?
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().context("couldn't determine local offset")?);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let runtime = Builder::new_multi_thread().enable_all().build()?;

    match Cli::parse().command {
        Commands::Fetch(args) => runtime.block_on(fetch::run(args)),
        Commands::Server(args) => runtime.block_on(server::run(args)),
    }
    .context("command failed")
}
