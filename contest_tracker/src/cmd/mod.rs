pub mod fetch;
pub mod server;

use anyhow::{Context, Result};
use clap::ValueEnum;
use contest_tracker_libs::sources::{
    ClistCredentials, SourceConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESOLVE_BUDGET,
};
use std::{env, fmt, time::Duration};

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum ContestKind {
    Upcoming,
    Past,
}

impl fmt::Display for ContestKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContestKind::Upcoming => write!(f, "upcoming"),
            ContestKind::Past => write!(f, "past"),
        }
    }
}

/// Build the upstream configuration from environment variables.
pub fn load_source_config() -> Result<SourceConfig> {
    let clist_credentials = match (env::var("CLIST_USERNAME"), env::var("CLIST_API_KEY")) {
        (Ok(username), Ok(api_key)) => Some(ClistCredentials { username, api_key }),
        _ => {
            tracing::warn!("CLIST_USERNAME or CLIST_API_KEY environment variable is not set. clist.by will be skipped.");
            None
        }
    };

    let request_timeout = duration_var("CONTEST_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT)?;
    let resolve_budget = duration_var("CONTEST_RESOLVE_BUDGET_MS", DEFAULT_RESOLVE_BUDGET)?;

    Ok(SourceConfig {
        request_timeout,
        resolve_budget,
        clist_credentials,
        ..SourceConfig::default()
    })
}

fn duration_var(name: &str, default: Duration) -> Result<Duration> {
    match env::var(name) {
        Ok(value) => {
            let millis: u64 = value.trim().parse().with_context(|| {
                let message = format!("{} must be a number of milliseconds", name);
                tracing::error!(message);
                message
            })?;
            Ok(Duration::from_millis(millis))
        }
        Err(_) => {
            tracing::warn!(
                "{} environment variable is not set. Default value `{}` will be used.",
                name,
                default.as_millis()
            );
            Ok(default)
        }
    }
}
