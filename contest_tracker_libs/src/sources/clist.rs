use crate::{
    contest::{Contest, Platform},
    sources::{
        endpoint_url,
        model::{ClistContest, ClistResponse},
        read_json, ClistCredentials, ContestSource, Result, SourceError,
    },
    window::Window,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use std::time::Duration;

const RESOURCES: &str = "codeforces.com,codechef.com,leetcode.com";
const LIMIT: &str = "200";

/// Primary aggregator: clist.by contest API.
pub struct ClistSource {
    url: Url,
    credentials: Option<ClistCredentials>,
    client: Client,
    timeout: Duration,
}

impl ClistSource {
    pub fn new(
        base_url: &str,
        credentials: Option<ClistCredentials>,
        client: Client,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(base_url, "api/v4/contest/")?,
            credentials,
            client,
            timeout,
        })
    }

    fn query(&self, credentials: &ClistCredentials, window: &Window) -> Vec<(&'static str, String)> {
        let order_by = if window.is_upcoming() { "start" } else { "-end" };

        let mut query = vec![
            ("username", credentials.username.clone()),
            ("api_key", credentials.api_key.clone()),
            ("resource__in", String::from(RESOURCES)),
            ("end__gt", format_bound(window.lower_bound())),
            ("order_by", String::from(order_by)),
            ("limit", String::from(LIMIT)),
        ];
        // past requests must not spend the limit on contests that have not ended
        if !window.is_upcoming() {
            query.push(("end__lt", format_bound(window.now())));
        }
        query
    }
}

#[async_trait]
impl ContestSource for ClistSource {
    fn name(&self) -> &str {
        "clist"
    }

    async fn fetch_contests(&self, window: &Window) -> Result<Vec<Contest>> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SourceError::MissingCredentials(String::from("CLIST_USERNAME and CLIST_API_KEY"))
        })?;

        let request = self
            .client
            .get(self.url.clone())
            .query(&self.query(credentials, window))
            .timeout(self.timeout);
        let response: ClistResponse = read_json(request).await?;

        Ok(map_response(response))
    }
}

fn format_bound(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn map_response(response: ClistResponse) -> Vec<Contest> {
    response.objects.into_iter().filter_map(to_contest).collect()
}

fn to_contest(contest: ClistContest) -> Option<Contest> {
    let (start_time, end_time) = match (contest.start, contest.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            tracing::debug!("skip clist contest {} without schedule", contest.id);
            return None;
        }
    };

    Some(Contest::new(
        contest.id,
        contest.event,
        Platform::from_site(&contest.resource),
        contest.href,
        start_time,
        end_time,
    ))
}
