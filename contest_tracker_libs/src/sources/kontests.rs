use crate::{
    contest::{offset_by_seconds, Contest, Platform},
    sources::{
        endpoint_url,
        model::{KontestsContest, Phase},
        read_json, ContestSource, Result,
    },
    window::Window,
};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, Url};
use std::time::Duration;

const SITES: [&str; 3] = ["codeforces", "code_chef", "leet_code"];

/// Secondary aggregator: one kontests.net endpoint per platform, fetched concurrently.
pub struct KontestsSource {
    endpoints: Vec<(String, Url)>,
    client: Client,
    timeout: Duration,
}

impl KontestsSource {
    pub fn new(base_url: &str, client: Client, timeout: Duration) -> Result<Self> {
        let endpoints = SITES
            .iter()
            .map(|site| -> Result<(String, Url)> {
                let url = endpoint_url(base_url, &format!("api/v1/{}", site))?;
                Ok((site.to_string(), url))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            endpoints,
            client,
            timeout,
        })
    }

    async fn fetch_site(&self, site: &str, url: &Url, window: &Window) -> Vec<Contest> {
        let request = self.client.get(url.clone()).timeout(self.timeout);
        match read_json::<Vec<KontestsContest>>(request).await {
            Ok(contests) => map_response(site, contests, window),
            Err(e) => {
                tracing::warn!("kontests endpoint {} is unavailable: {}", site, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ContestSource for KontestsSource {
    fn name(&self) -> &str {
        "kontests"
    }

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>> {
        let tasks = self
            .endpoints
            .iter()
            .map(|(site, url)| self.fetch_site(site, url, window));
        let contests = join_all(tasks).await.into_iter().flatten().collect();

        Ok(contests)
    }
}

fn map_response(site: &str, contests: Vec<KontestsContest>, window: &Window) -> Vec<Contest> {
    contests
        .into_iter()
        .filter(|contest| match contest.status.as_deref() {
            Some(status) => Phase::from(status).admits(window),
            None => true,
        })
        .filter_map(|contest| to_contest(site, contest))
        .collect()
}

fn to_contest(site: &str, contest: KontestsContest) -> Option<Contest> {
    let start_time = contest.start_time?;
    let end_time = match (contest.end_time, contest.duration) {
        (Some(end_time), _) => end_time,
        (None, Some(duration)) if duration.is_finite() => {
            offset_by_seconds(start_time, duration as i64)?
        }
        _ => return None,
    };
    let platform = Platform::from_site(contest.site.as_deref().unwrap_or(site));

    Some(Contest::with_synthetic_id(
        contest.name,
        platform,
        contest.url,
        start_time,
        end_time,
    ))
}
