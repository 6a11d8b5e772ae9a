use crate::{
    cmd::{load_source_config, ContestKind},
    modules::models::request::parse_platforms,
};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use contest_tracker_libs::{ContestResolver, Window, DEFAULT_PAST_MONTHS};

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[arg(value_enum)]
    kind: ContestKind,
    /// Length of the past window in calendar months
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    months: Option<u32>,
    /// Comma-separated platforms to keep, e.g. `codeforces,leetcode`
    #[arg(long)]
    platform: Option<String>,
}

pub async fn run(args: FetchArgs) -> Result<()> {
    let platforms = match &args.platform {
        Some(platform) => parse_platforms(platform)
            .with_context(|| format!("unknown platform in `{}`", platform))?,
        None => Vec::new(),
    };

    let config = load_source_config()?;
    let resolver = ContestResolver::from_config(&config).with_context(|| {
        let message = "couldn't create contest resolver. check the upstream settings.";
        tracing::error!(message);
        message
    })?;

    let now = Utc::now();
    let window = match args.kind {
        ContestKind::Upcoming => Window::upcoming(now),
        ContestKind::Past => Window::recent_past(now, args.months.unwrap_or(DEFAULT_PAST_MONTHS)),
    };

    tracing::info!("fetch {} contests", args.kind);
    let resolution = resolver.resolve(&window).await.retain_platforms(&platforms);
    tracing::info!(
        "{} contests resolved from {} tier",
        resolution.contests.len(),
        resolution.tier
    );

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}
