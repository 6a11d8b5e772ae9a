pub mod clist;
pub mod codechef;
pub mod codeforces;
pub mod kontests;
pub mod leetcode;
pub mod model;

use crate::{contest::Contest, window::Window};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub use clist::ClistSource;
pub use codechef::CodechefSource;
pub use codeforces::CodeforcesSource;
pub use kontests::KontestsSource;
pub use leetcode::LeetcodeSource;

pub type Result<T> = std::result::Result<T, SourceError>;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(3500);
pub const DEFAULT_RESOLVE_BUDGET: Duration = Duration::from_millis(9000);
const USER_AGENT: &str = concat!("contest_tracker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to request to upstream: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data: {0}")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid upstream url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
    #[error("upstream reported a failure: {0}")]
    UpstreamError(String),
}

/// A provider of contest data.
///
/// Implementors report every failure through `fetch_contests`. Callers that must not
/// fail use [`ContestSource::collect`], which turns failures into an empty list.
#[async_trait]
pub trait ContestSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>>;

    async fn collect(&self, window: &Window) -> Vec<Contest> {
        match self.fetch_contests(window).await {
            Ok(contests) => {
                tracing::debug!("{} returned {} contests", self.name(), contests.len());
                contests
            }
            Err(e) => {
                tracing::warn!("{} is unavailable: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClistCredentials {
    pub username: String,
    pub api_key: String,
}

/// Base URLs of every upstream. Only tests point them somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub clist: String,
    pub codeforces: String,
    pub leetcode: String,
    pub codechef: String,
    pub kontests: String,
}

impl SourceEndpoints {
    pub fn all(base_url: &str) -> Self {
        Self {
            clist: base_url.to_string(),
            codeforces: base_url.to_string(),
            leetcode: base_url.to_string(),
            codechef: base_url.to_string(),
            kontests: base_url.to_string(),
        }
    }
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            clist: String::from("https://clist.by"),
            codeforces: String::from("https://codeforces.com"),
            leetcode: String::from("https://leetcode.com"),
            codechef: String::from("https://www.codechef.com"),
            kontests: String::from("https://kontests.net"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub request_timeout: Duration,
    pub resolve_budget: Duration,
    pub clist_credentials: Option<ClistCredentials>,
    pub endpoints: SourceEndpoints,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            resolve_budget: DEFAULT_RESOLVE_BUDGET,
            clist_credentials: None,
            endpoints: SourceEndpoints::default(),
        }
    }
}

pub fn build_client() -> Result<Client> {
    let client = Client::builder().gzip(true).user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Resolve `path` against the origin of `base_url`, dropping any path the base carries.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.set_path("");
    Ok(url.join(path)?)
}

/// Send the request and decode a successful JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let res = request.send().await?.error_for_status()?;
    let body = res.text().await?;
    Ok(serde_json::from_str(&body)?)
}
